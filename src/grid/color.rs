use crate::data::Schedule;
use ratatui::style::Color;
use std::collections::HashMap;

/// Block background colors, cycled per course.
pub const PALETTE: [Color; 6] = [
    Color::Rgb(0xff, 0xdd, 0xdd),
    Color::Rgb(0xff, 0xff, 0xdd),
    Color::Rgb(0xdd, 0xff, 0xff),
    Color::Rgb(0xdd, 0xdd, 0xff),
    Color::Rgb(0xff, 0xdd, 0xff),
    Color::Rgb(0xdd, 0xff, 0xdd),
];

/// Picks a color by the position of `lecture_id` among the distinct lecture ids
/// of `schedules`, in first-occurrence order.
///
/// The result depends on the current list: removing an earlier course shifts
/// the colors of every course after it. `LectureColors` is the stable variant.
pub fn color_for<'a, I>(schedules: I, lecture_id: &str) -> Color
where
    I: IntoIterator<Item = &'a Schedule>,
{
    let mut seen: Vec<&str> = Vec::new();
    for s in schedules {
        let id = s.lecture.id.as_str();
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    let position = seen.iter().position(|id| *id == lecture_id).unwrap_or(0);
    PALETTE[position % PALETTE.len()]
}

/// Colors assigned once per lecture id, at first sight, and never reassigned.
#[derive(Debug, Default, Clone)]
pub struct LectureColors {
    assigned: HashMap<String, Color>,
    next: usize,
}

impl LectureColors {
    /// Returns the lecture's color, assigning the next palette entry on first use.
    pub fn assign(&mut self, lecture_id: &str) -> Color {
        if let Some(color) = self.assigned.get(lecture_id) {
            return *color;
        }
        let color = PALETTE[self.next % PALETTE.len()];
        self.next += 1;
        self.assigned.insert(lecture_id.to_string(), color);
        color
    }

    pub fn get(&self, lecture_id: &str) -> Option<Color> {
        self.assigned.get(lecture_id).copied()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.assigned.len()
    }
}
