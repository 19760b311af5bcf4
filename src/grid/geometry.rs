//! Mapping between (day, slot) grid positions and cell rectangles.
//!
//! A table grid is a header row of day labels above a header column of slot
//! labels, followed by `DAY_LABELS.len()` columns and `SLOT_COUNT` rows. All
//! coordinates are relative to the grid's top-left corner.

use crate::data::{DAY_LABELS, Day};
use crate::error::{Result, TimetableError};
use chrono::{Duration, NaiveTime};
use ratatui::layout::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Rows in a day.
pub const SLOT_COUNT: usize = 24;
/// Leading 30-minute slots; the rest form the evening session.
pub const DAYTIME_SLOTS: usize = 18;

const BASE_MINUTES: i64 = 9 * 60;
const DAYTIME_STEP: u32 = 30;
const EVENING_STEP: u32 = 55;
const EVENING_LENGTH: u32 = 50;
const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DurationClass {
    Daytime,
    Evening,
}

/// One row of the grid. Minutes count from the 09:00 base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    pub index: u8,
    pub start: u32,
    pub end: u32,
    pub class: DurationClass,
}

impl TimeSlot {
    /// `"09:00~09:30"`
    pub fn label(&self) -> String {
        format!(
            "{}~{}",
            format_clock_label(i64::from(self.start)),
            format_clock_label(i64::from(self.end))
        )
    }

    /// `"01 (09:00~09:30)"`, as shown in the row header.
    pub fn row_label(&self) -> String {
        format!("{:02} ({})", self.index, self.label())
    }

    pub fn is_evening(&self) -> bool {
        self.class == DurationClass::Evening
    }
}

/// The 24 rows of a day, slot 1 first.
pub fn time_slots() -> Vec<TimeSlot> {
    let daytime = (0..DAYTIME_SLOTS as u32).map(|k| TimeSlot {
        index: k as u8 + 1,
        start: k * DAYTIME_STEP,
        end: (k + 1) * DAYTIME_STEP,
        class: DurationClass::Daytime,
    });
    let evening_base = DAYTIME_SLOTS as u32 * DAYTIME_STEP;
    let evening = (0..(SLOT_COUNT - DAYTIME_SLOTS) as u32).map(move |k| {
        let start = evening_base + k * EVENING_STEP;
        TimeSlot {
            index: (DAYTIME_SLOTS as u32 + k) as u8 + 1,
            start,
            end: start + EVENING_LENGTH,
            class: DurationClass::Evening,
        }
    });
    daytime.chain(evening).collect()
}

/// Renders a minute offset from 09:00 as `HH:MM`, wrapping at midnight.
pub fn format_clock_label(minutes_since_base: i64) -> String {
    let minutes = (BASE_MINUTES + minutes_since_base.rem_euclid(MINUTES_PER_DAY))
        .rem_euclid(MINUTES_PER_DAY);
    (NaiveTime::default() + Duration::minutes(minutes))
        .format("%H:%M")
        .to_string()
}

/// Cell dimensions of a table grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridMetrics {
    pub column_width: u16,
    pub row_height: u16,
    pub header_width: u16,
    pub header_height: u16,
}

impl Default for GridMetrics {
    fn default() -> Self {
        GridMetrics {
            column_width: 10,
            row_height: 1,
            header_width: 18,
            header_height: 1,
        }
    }
}

/// Full extent of one grid, headers included. Saturates at `u16::MAX`.
pub fn grid_size(metrics: &GridMetrics) -> Size {
    Size {
        width: metrics
            .header_width
            .saturating_add(metrics.column_width.saturating_mul(DAY_LABELS.len() as u16)),
        height: metrics
            .header_height
            .saturating_add(metrics.row_height.saturating_mul(SLOT_COUNT as u16)),
    }
}

/// Rectangle covering `slot_count` rows from `slot_start` in `day`'s column.
pub fn cell_rect(day: Day, slot_start: u8, slot_count: u8, metrics: &GridMetrics) -> Result<Rect> {
    let last = usize::from(slot_start) + usize::from(slot_count);
    if slot_start == 0 || slot_count == 0 || last - 1 > SLOT_COUNT {
        return Err(TimetableError::InvalidRange(format!(
            "start {} length {}",
            slot_start, slot_count
        )));
    }
    let left = u32::from(metrics.header_width) + u32::from(metrics.column_width) * day.index() as u32;
    let top = u32::from(metrics.header_height)
        + u32::from(metrics.row_height) * (u32::from(slot_start) - 1);
    let height = u32::from(metrics.row_height) * u32::from(slot_count);
    let fit = |v: u32| {
        u16::try_from(v).map_err(|_| TimetableError::OutOfBounds {
            x: left as i32,
            y: top as i32,
        })
    };
    Ok(Rect::new(fit(left)?, fit(top)?, metrics.column_width, fit(height)?))
}

/// Like `cell_rect`, for a day given by its label.
pub fn cell_rect_by_label(
    day: &str,
    slot_start: u8,
    slot_count: u8,
    metrics: &GridMetrics,
) -> Result<Rect> {
    cell_rect(day.parse()?, slot_start, slot_count, metrics)
}

/// The (day, slot) under a point, or `OutOfBounds` when the point is on a
/// header or past the last column/row.
pub fn cell_at(x: i32, y: i32, metrics: &GridMetrics) -> Result<(Day, u8)> {
    let out = TimetableError::OutOfBounds { x, y };
    if metrics.column_width == 0 || metrics.row_height == 0 {
        return Err(out);
    }
    let col = (x - i32::from(metrics.header_width)).div_euclid(i32::from(metrics.column_width));
    let row = (y - i32::from(metrics.header_height)).div_euclid(i32::from(metrics.row_height));
    if x < i32::from(metrics.header_width) || y < i32::from(metrics.header_height) {
        return Err(out);
    }
    let day = usize::try_from(col).ok().and_then(Day::from_index).ok_or(out.clone())?;
    let slot = usize::try_from(row)
        .ok()
        .filter(|r| *r < SLOT_COUNT)
        .ok_or(out)?;
    Ok((day, slot as u8 + 1))
}
