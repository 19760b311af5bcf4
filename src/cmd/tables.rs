use anyhow::Result;
use std::io::Write;
use timetable::data::persistence::get_data_dir;
use timetable::data::{ScheduleStore, SeedData, SlotRange};
use timetable::grid::{format_clock_label, time_slots};

pub fn run() -> Result<()> {
    let store = SeedData::load_or_builtin(&get_data_dir()?)?.into_store()?;
    write_tables(&store, &mut std::io::stdout())
}

/// `"09:00~10:30"` for the whole span of `range`.
fn span_label(range: &SlotRange) -> String {
    let slots = time_slots();
    let at = |slot: u8| slots.get(usize::from(slot) - 1);
    match (at(range.start()), at(range.end())) {
        (Some(first), Some(last)) => format!(
            "{}~{}",
            format_clock_label(i64::from(first.start)),
            format_clock_label(i64::from(last.end))
        ),
        _ => String::new(),
    }
}

pub(crate) fn write_tables<W: Write>(store: &ScheduleStore, out: &mut W) -> Result<()> {
    for id in store.table_ids() {
        let entries = store.entries(id);
        writeln!(out, "Table {}", id)?;
        writeln!(out, "---")?;
        writeln!(
            out,
            "  {:<5} {:<5} {:<6} {:<12} {:<8} {}",
            "Entry", "Day", "Slots", "Time", "Room", "Lecture"
        )?;
        for entry in entries.iter() {
            let s = &entry.schedule;
            let slots = if s.range.len() == 1 {
                s.range.start().to_string()
            } else {
                format!("{}-{}", s.range.start(), s.range.end())
            };
            writeln!(
                out,
                "  {:<5} {:<5} {:<6} {:<12} {:<8} {} {}",
                entry.id.to_string(),
                s.day,
                slots,
                span_label(&s.range),
                s.room,
                s.lecture.id,
                s.lecture.title
            )?;
        }
        writeln!(out, "---")?;
        writeln!(out, "Total: {} schedule(s)", entries.len())?;
        writeln!(out)?;
    }
    writeln!(out, "{} table(s)", store.len())?;
    Ok(())
}
