use crate::data::persistence::Persistable;
use crate::data::{Day, Lecture, Schedule, ScheduleStore, SlotRange, TableId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SeedTable {
    pub id: TableId,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

/// Starting tables of a session, read from seed.json.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq)]
pub struct SeedData {
    pub tables: Vec<SeedTable>,
}

impl Persistable for SeedData {
    fn filename() -> &'static str {
        "seed.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl SeedData {
    /// seed.json from `dir`, or the built-in tables when there is no such file.
    pub fn load_or_builtin(dir: &Path) -> Result<Self> {
        if !Self::exists_in(dir) {
            info!("no seed file in {}, using built-in tables", dir.display());
            return Ok(Self::builtin());
        }
        let mut seed = Self::load_from(dir)?;
        seed.share_lectures();
        Ok(seed)
    }

    /// Points every schedule naming the same lecture id at one `Arc`.
    /// The first definition of an id wins.
    pub fn share_lectures(&mut self) {
        let mut shared: HashMap<String, Arc<Lecture>> = HashMap::new();
        for table in &mut self.tables {
            for schedule in &mut table.schedules {
                let lecture = shared
                    .entry(schedule.lecture.id.clone())
                    .or_insert_with(|| Arc::clone(&schedule.lecture));
                schedule.lecture = Arc::clone(lecture);
            }
        }
    }

    /// Distinct lectures in first-occurrence order.
    pub fn lectures(&self) -> Vec<Arc<Lecture>> {
        let mut out: Vec<Arc<Lecture>> = Vec::new();
        for schedule in self.tables.iter().flat_map(|t| &t.schedules) {
            if !out.iter().any(|l| l.id == schedule.lecture.id) {
                out.push(Arc::clone(&schedule.lecture));
            }
        }
        out
    }

    /// Builds the session store. A seed without tables starts with one empty table.
    pub fn into_store(self) -> Result<ScheduleStore> {
        let mut tables: Vec<(TableId, Vec<Schedule>)> = self
            .tables
            .into_iter()
            .map(|t| (t.id, t.schedules))
            .collect();
        if tables.is_empty() {
            tables.push((TableId::new("schedule-1")?, Vec::new()));
        }
        ScheduleStore::from_tables(tables).context("invalid seed tables")
    }

    pub fn builtin() -> Self {
        let course = |id: &str, title: &str| Arc::new(Lecture::new(id, title));
        let algorithms = course("CS201", "Algorithms");
        let databases = course("CS305", "Databases");
        let networks = course("CS340", "Computer Networks");
        let writing = course("HUM110", "Technical Writing");
        let statistics = course("MATH210", "Statistics");

        let at = |day: Day, start: u8, len: u8, room: &str, lecture: &Arc<Lecture>| {
            SlotRange::new(start, len)
                .map(|range| Schedule::new(day, range, room, Arc::clone(lecture)))
        };
        let first = [
            at(Day::Mon, 1, 3, "E301", &algorithms),
            at(Day::Wed, 1, 3, "E301", &algorithms),
            at(Day::Tue, 7, 2, "B104", &databases),
            at(Day::Thu, 7, 2, "B104", &databases),
            at(Day::Fri, 19, 2, "N210", &networks),
        ];
        let second = [
            at(Day::Mon, 5, 2, "H12", &writing),
            at(Day::Tue, 1, 4, "M201", &statistics),
            at(Day::Thu, 11, 3, "E301", &algorithms),
        ];
        // every literal above fits the grid
        let tables = [("schedule-1", Vec::from(first)), ("schedule-2", Vec::from(second))]
            .into_iter()
            .filter_map(|(id, rows)| {
                Some(SeedTable {
                    id: TableId::new(id).ok()?,
                    schedules: rows.into_iter().filter_map(|r| r.ok()).collect(),
                })
            })
            .collect();
        SeedData { tables }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_has_two_tables_with_all_rows() {
        let seed = SeedData::builtin();
        assert_eq!(seed.tables.len(), 2);
        assert_eq!(seed.tables[0].schedules.len(), 5);
        assert_eq!(seed.tables[1].schedules.len(), 3);
    }

    #[test]
    fn test_builtin_shares_lecture_across_tables() {
        let seed = SeedData::builtin();
        let a = &seed.tables[0].schedules[0].lecture;
        let b = &seed.tables[1].schedules[2].lecture;
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn test_lectures_are_distinct_in_first_occurrence_order() {
        let ids: Vec<String> = SeedData::builtin()
            .lectures()
            .iter()
            .map(|l| l.id.clone())
            .collect();
        assert_eq!(ids, vec!["CS201", "CS305", "CS340", "HUM110", "MATH210"]);
    }

    #[test]
    fn test_load_or_builtin_without_file() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(SeedData::load_or_builtin(tmp.path()).unwrap(), SeedData::builtin());
    }

    #[test]
    fn test_load_shares_lectures_from_json() {
        let tmp = TempDir::new().unwrap();
        SeedData::builtin().save_to(tmp.path()).unwrap();
        let seed = SeedData::load_or_builtin(tmp.path()).unwrap();
        assert_eq!(seed, SeedData::builtin());
        assert!(Arc::ptr_eq(
            &seed.tables[0].schedules[0].lecture,
            &seed.tables[1].schedules[2].lecture
        ));
    }

    #[test]
    fn test_seed_json_rejects_bad_rows() {
        let json = r#"{"tables":[{"id":"t","schedules":[{"day":"Sun","range":[1],"room":"","lecture":{"id":"a","title":"a"}}]}]}"#;
        assert!(serde_json::from_str::<SeedData>(json).is_err());
        let json = r#"{"tables":[{"id":"t:1","schedules":[]}]}"#;
        assert!(serde_json::from_str::<SeedData>(json).is_err());
    }

    #[test]
    fn test_into_store_keeps_table_order() {
        let store = SeedData::builtin().into_store().unwrap();
        let ids: Vec<&str> = store.table_ids().map(|t| t.as_str()).collect();
        assert_eq!(ids, vec!["schedule-1", "schedule-2"]);
    }

    #[test]
    fn test_into_store_empty_seed_gets_one_table() {
        let store = SeedData::default().into_store().unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_into_store_rejects_repeated_table() {
        let mut seed = SeedData::builtin();
        let again = seed.tables[0].clone();
        seed.tables.push(again);
        assert!(seed.into_store().is_err());
    }
}
