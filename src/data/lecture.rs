use serde::{Deserialize, Serialize};

/// A course offering. Entries in any table point at the same `Arc<Lecture>`
/// when they place the same course.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Lecture {
    pub id: String,
    pub title: String,
}

impl Lecture {
    pub fn new(id: &str, title: &str) -> Self {
        Lecture {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}
