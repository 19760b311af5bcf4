use crate::data::{Day, Schedule, TableId};
use crate::error::{Result, TimetableError};
use crate::grid::color::LectureColors;
use ratatui::style::Color;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Store-assigned identifier of one entry, unique within its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: EntryId,
    pub schedule: Schedule,
}

/// A table's entry sequence. Every mutation of a table installs a new `Arc`,
/// so an unchanged pointer means unchanged contents.
pub type Entries = Arc<Vec<ScheduleEntry>>;

/// The session's tables, in display order.
///
/// The store does not keep at least one table around: `remove_table` happily
/// empties it. Callers that need a table on screen must refuse the last removal.
#[derive(Debug, Default, Clone)]
pub struct ScheduleStore {
    tables: Vec<(TableId, Entries)>,
    next_entry: u64,
    next_table: u64,
    colors: LectureColors,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from seed tables, keeping their order.
    pub fn from_tables<I>(tables: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TableId, Vec<Schedule>)>,
    {
        let mut store = Self::new();
        for (id, schedules) in tables {
            if store.contains(&id) {
                return Err(TimetableError::DuplicateTable(id.to_string()));
            }
            store.replace_table(&id, schedules);
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, id: &TableId) -> bool {
        self.tables.iter().any(|(t, _)| t == id)
    }

    pub fn table_ids(&self) -> impl Iterator<Item = &TableId> {
        self.tables.iter().map(|(id, _)| id)
    }

    pub fn get(&self, id: &TableId) -> Option<&Entries> {
        self.tables.iter().find(|(t, _)| t == id).map(|(_, e)| e)
    }

    /// The table's entries, or an empty sequence when the table is absent.
    pub fn entries(&self, id: &TableId) -> Entries {
        self.get(id).cloned().unwrap_or_default()
    }

    /// Plain schedules of a table, in order.
    pub fn schedules(&self, id: &TableId) -> Vec<Schedule> {
        self.entries(id)
            .iter()
            .map(|e| e.schedule.clone())
            .collect()
    }

    pub fn position_of(&self, id: &TableId, entry: EntryId) -> Option<usize> {
        self.get(id)?.iter().position(|e| e.id == entry)
    }

    /// Color assigned to a lecture the first time the store saw it.
    pub fn lecture_color(&self, lecture_id: &str) -> Option<Color> {
        self.colors.get(lecture_id)
    }

    /// Overwrites the table's sequence, creating the table when absent.
    /// Overlapping schedules are accepted as given.
    pub fn replace_table(&mut self, id: &TableId, schedules: Vec<Schedule>) {
        let entries: Vec<ScheduleEntry> = schedules
            .into_iter()
            .map(|schedule| self.new_entry(schedule))
            .collect();
        debug!(table = %id, count = entries.len(), "replace table");
        let entries = Arc::new(entries);
        match self.slot_mut(id) {
            Some(slot) => *slot = entries,
            None => self.tables.push((id.clone(), entries)),
        }
    }

    /// Appends one schedule, creating the table when absent.
    pub fn append_item(&mut self, id: &TableId, schedule: Schedule) -> EntryId {
        let entry = self.new_entry(schedule);
        let entry_id = entry.id;
        debug!(table = %id, entry = %entry_id, "append item");
        match self.slot_mut(id) {
            Some(slot) => {
                let mut next = (**slot).clone();
                next.push(entry);
                *slot = Arc::new(next);
            }
            None => self.tables.push((id.clone(), Arc::new(vec![entry]))),
        }
        entry_id
    }

    /// Copies the source table under a freshly generated id, placed last.
    /// The copy shares lectures with the source but not its sequence.
    pub fn duplicate_table(&mut self, source: &TableId) -> Result<TableId> {
        let entries = self
            .get(source)
            .ok_or_else(|| TimetableError::UnknownTable(source.to_string()))?;
        let copy = Arc::new((**entries).clone());
        let new_id = self.fresh_table_id();
        debug!(source = %source, table = %new_id, "duplicate table");
        self.tables.push((new_id.clone(), copy));
        Ok(new_id)
    }

    /// Deletes the table. Absent tables are ignored so a repeated click is harmless.
    /// Returns whether a table was removed.
    pub fn remove_table(&mut self, id: &TableId) -> bool {
        let before = self.tables.len();
        self.tables.retain(|(t, _)| t != id);
        let removed = self.tables.len() != before;
        debug!(table = %id, removed, "remove table");
        removed
    }

    /// Replaces the entry at `index`. The entry keeps its id.
    ///
    /// Indices shift on every removal: derive `index` from the current entries,
    /// never from an earlier read.
    pub fn update_item(&mut self, id: &TableId, index: usize, schedule: Schedule) -> Result<()> {
        let lecture = Arc::clone(&schedule.lecture);
        let slot = self
            .slot_mut(id)
            .ok_or_else(|| TimetableError::UnknownTable(id.to_string()))?;
        if index >= slot.len() {
            return Err(TimetableError::IndexOutOfRange {
                table: id.to_string(),
                index,
                len: slot.len(),
            });
        }
        let mut next = (**slot).clone();
        next[index].schedule = schedule;
        *slot = Arc::new(next);
        self.colors.assign(&lecture.id);
        debug!(table = %id, index, "update item");
        Ok(())
    }

    /// Replaces the entry carrying `entry`, wherever it currently sits.
    pub fn update_entry(&mut self, id: &TableId, entry: EntryId, schedule: Schedule) -> Result<()> {
        if !self.contains(id) {
            return Err(TimetableError::UnknownTable(id.to_string()));
        }
        let index = self
            .position_of(id, entry)
            .ok_or_else(|| TimetableError::UnknownEntry {
                table: id.to_string(),
                entry: entry.value(),
            })?;
        self.update_item(id, index, schedule)
    }

    /// Removes every entry on `day` whose range covers `slot`.
    /// Returns how many were removed; an absent table removes nothing.
    pub fn remove_items(&mut self, id: &TableId, day: Day, slot: u8) -> usize {
        let Some(entries) = self.slot_mut(id) else {
            debug!(table = %id, "remove items on absent table");
            return 0;
        };
        let next: Vec<ScheduleEntry> = entries
            .iter()
            .filter(|e| !e.schedule.occupies(day, slot))
            .cloned()
            .collect();
        let removed = entries.len() - next.len();
        if removed > 0 {
            *entries = Arc::new(next);
        }
        debug!(table = %id, %day, slot, removed, "remove items");
        removed
    }

    fn slot_mut(&mut self, id: &TableId) -> Option<&mut Entries> {
        self.tables
            .iter_mut()
            .find(|(t, _)| t == id)
            .map(|(_, e)| e)
    }

    fn new_entry(&mut self, schedule: Schedule) -> ScheduleEntry {
        self.colors.assign(&schedule.lecture.id);
        self.next_entry += 1;
        ScheduleEntry {
            id: EntryId(self.next_entry),
            schedule,
        }
    }

    fn fresh_table_id(&mut self) -> TableId {
        loop {
            self.next_table += 1;
            let candidate = TableId::generated(self.next_table);
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }
}
