use anyhow::Result;
use std::io::Write;
use timetable::grid::{TimeSlot, time_slots};

pub fn run() -> Result<()> {
    write_slots(&time_slots(), &mut std::io::stdout())
}

pub(crate) fn write_slots<W: Write>(slots: &[TimeSlot], out: &mut W) -> Result<()> {
    writeln!(out, "Time slots")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<5} {:<12} {}", "Slot", "Time", "Session")?;
    for slot in slots {
        let session = if slot.is_evening() { "evening" } else { "day" };
        writeln!(out, "  {:<5} {:<12} {}", slot.index, slot.label(), session)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} slot(s)", slots.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render() -> String {
        let mut buf = Vec::new();
        write_slots(&time_slots(), &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_slots_all_rows() {
        let out = render();
        assert!(out.contains("Total: 24 slot(s)"));
        assert_eq!(out.matches(" day").count(), 18);
        assert_eq!(out.matches(" evening").count(), 6);
    }

    #[test]
    fn test_write_slots_boundaries() {
        let out = render();
        assert!(out.contains("09:00~09:30"));
        assert!(out.contains("17:30~18:00"));
        assert!(out.contains("18:00~18:50"));
        assert!(out.contains("22:35~23:25"));
    }

    #[test]
    fn test_write_slots_empty() {
        let mut buf = Vec::new();
        write_slots(&[], &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Total: 0 slot(s)"));
    }
}
