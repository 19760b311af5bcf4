use crate::error::{Result, TimetableError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the table id and the entry index in a drag id.
pub const DRAG_ID_SEPARATOR: char = ':';

/// Opaque table identifier. Never empty and never contains `DRAG_ID_SEPARATOR`,
/// so a drag id always splits back into the table it came from.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct TableId(String);

impl TableId {
    pub fn new(id: &str) -> Result<Self> {
        if id.is_empty() || id.contains(DRAG_ID_SEPARATOR) {
            return Err(TimetableError::InvalidTableId(id.to_string()));
        }
        Ok(TableId(id.to_string()))
    }

    /// Identifier for a store-created table. The alphabet never includes the separator.
    pub(crate) fn generated(n: u64) -> Self {
        TableId(format!("schedule-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TableId {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableId {
    type Error = TimetableError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_id_accepts_plain_names() {
        let id = TableId::new("schedule-1").unwrap();
        assert_eq!(id.as_str(), "schedule-1");
        assert_eq!(id.to_string(), "schedule-1");
    }

    #[test]
    fn test_generated_table_id_is_valid() {
        let id = TableId::generated(12);
        assert_eq!(TableId::new(id.as_str()), Ok(id.clone()));
    }

    #[test]
    fn test_table_id_rejects_separator() {
        assert_eq!(
            TableId::new("a:b"),
            Err(TimetableError::InvalidTableId("a:b".to_string()))
        );
    }

    #[test]
    fn test_table_id_rejects_empty() {
        assert!(TableId::new("").is_err());
    }

    #[test]
    fn test_table_id_deserialize_validates() {
        let ok: TableId = serde_json::from_str(r#""tbl-1""#).unwrap();
        assert_eq!(ok.as_str(), "tbl-1");
        assert!(serde_json::from_str::<TableId>(r#""tbl:1""#).is_err());
    }
}
