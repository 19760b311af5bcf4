use crate::data::lecture::Lecture;
use crate::error::{Result, TimetableError};
use crate::grid::geometry::SLOT_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Column labels of the grid, left to right.
pub const DAY_LABELS: [&str; 6] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    /// Column index of this day in `DAY_LABELS`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Day> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        DAY_LABELS[self.index()]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Day {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        DAY_LABELS
            .iter()
            .position(|label| *label == s)
            .and_then(Day::from_index)
            .ok_or_else(|| TimetableError::InvalidDay(s.to_string()))
    }
}

/// A run of consecutive 1-based slots, e.g. `[3, 4]`.
///
/// Serialized as the explicit slot list so seed files read like the grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SlotRange {
    start: u8,
    len: u8,
}

impl SlotRange {
    pub fn new(start: u8, len: u8) -> Result<Self> {
        if start == 0 || len == 0 {
            return Err(TimetableError::InvalidRange(format!(
                "start {} length {}",
                start, len
            )));
        }
        let end = start as usize + len as usize - 1;
        if end > SLOT_COUNT {
            return Err(TimetableError::InvalidRange(format!(
                "slots {}..={} exceed the {} slot grid",
                start, end, SLOT_COUNT
            )));
        }
        Ok(SlotRange { start, len })
    }

    pub fn from_slots(slots: &[u8]) -> Result<Self> {
        let Some(&first) = slots.first() else {
            return Err(TimetableError::InvalidRange("empty range".to_string()));
        };
        let consecutive = slots
            .windows(2)
            .all(|w| w[0].checked_add(1) == Some(w[1]));
        if !consecutive {
            return Err(TimetableError::InvalidRange(format!(
                "{:?} is not consecutive ascending",
                slots
            )));
        }
        let len = u8::try_from(slots.len())
            .map_err(|_| TimetableError::InvalidRange(format!("{:?} is too long", slots)))?;
        Self::new(first, len)
    }

    pub fn start(&self) -> u8 {
        self.start
    }

    /// Last occupied slot, inclusive.
    pub fn end(&self) -> u8 {
        self.start + self.len - 1
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn contains(&self, slot: u8) -> bool {
        slot >= self.start && slot <= self.end()
    }

    pub fn slots(&self) -> impl Iterator<Item = u8> {
        self.start..=self.end()
    }

    /// Same duration, moved by `delta` rows. Fails when the result leaves the grid.
    pub fn shifted(&self, delta: i32) -> Result<Self> {
        let start = i32::from(self.start) + delta;
        let start = u8::try_from(start).map_err(|_| {
            TimetableError::InvalidRange(format!("start slot {} is off the grid", start))
        })?;
        Self::new(start, self.len)
    }
}

impl TryFrom<Vec<u8>> for SlotRange {
    type Error = TimetableError;

    fn try_from(slots: Vec<u8>) -> Result<Self> {
        Self::from_slots(&slots)
    }
}

impl From<SlotRange> for Vec<u8> {
    fn from(range: SlotRange) -> Self {
        range.slots().collect()
    }
}

/// One placed course block.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub day: Day,
    pub range: SlotRange,
    pub room: String,
    pub lecture: Arc<Lecture>,
}

impl Schedule {
    pub fn new(day: Day, range: SlotRange, room: &str, lecture: Arc<Lecture>) -> Self {
        Schedule {
            day,
            range,
            room: room.to_string(),
            lecture,
        }
    }

    /// True when this block sits on `day` and covers `slot`.
    pub fn occupies(&self, day: Day, slot: u8) -> bool {
        self.day == day && self.range.contains(slot)
    }
}
