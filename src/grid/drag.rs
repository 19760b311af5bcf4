//! Drag identifiers and the drag gesture.
//!
//! A draggable block is named `"<table>:<index>"`. The drag layer only sees
//! these strings; they are decoded back into a table and a position when the
//! drag is dropped or when a table asks whether the drag started inside it.

use crate::data::{DRAG_ID_SEPARATOR, Day, Schedule, TableId};
use crate::error::{Result, TimetableError};
use crate::grid::geometry::GridMetrics;
use std::fmt;
use std::str::FromStr;

/// A table and an entry position within it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DragId {
    pub table_id: TableId,
    pub index: usize,
}

impl DragId {
    pub fn new(table_id: TableId, index: usize) -> Self {
        DragId { table_id, index }
    }
}

impl fmt::Display for DragId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.table_id, DRAG_ID_SEPARATOR, self.index)
    }
}

impl FromStr for DragId {
    type Err = TimetableError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || TimetableError::MalformedDragId(s.to_string());
        let (table, index) = s.split_once(DRAG_ID_SEPARATOR).ok_or_else(malformed)?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let index = index.parse::<usize>().map_err(|_| malformed())?;
        let table_id = TableId::new(table).map_err(|_| malformed())?;
        Ok(DragId { table_id, index })
    }
}

pub fn encode_drag_id(table_id: &TableId, index: usize) -> String {
    DragId::new(table_id.clone(), index).to_string()
}

pub fn decode_drag_id(id: &str) -> Result<DragId> {
    id.parse()
}

/// Table the active drag started from. `None` when nothing is being dragged
/// or the active id is not one of ours.
pub fn active_table_id(current: Option<&str>) -> Option<TableId> {
    current
        .and_then(|id| decode_drag_id(id).ok())
        .map(|drag| drag.table_id)
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ActiveDrag {
    id: String,
    origin: (i32, i32),
    current: (i32, i32),
}

/// Where a drag ended, relative to where it started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragRelease {
    pub id: String,
    pub dx: i32,
    pub dy: i32,
}

impl DragRelease {
    pub fn target(&self) -> Result<DragId> {
        decode_drag_id(&self.id)
    }
}

/// One press-move-release gesture. At most one drag is active at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn start(&mut self, id: impl Into<String>, x: i32, y: i32) {
        self.active = Some(ActiveDrag {
            id: id.into(),
            origin: (x, y),
            current: (x, y),
        });
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        if let Some(drag) = self.active.as_mut() {
            drag.current = (x, y);
        }
    }

    /// Ends the gesture. `None` when no drag was active.
    pub fn end(&mut self) -> Option<DragRelease> {
        self.active.take().map(|drag| DragRelease {
            id: drag.id,
            dx: drag.current.0 - drag.origin.0,
            dy: drag.current.1 - drag.origin.1,
        })
    }

    /// Renames the active drag, keeping its press point and pointer.
    pub fn retarget(&mut self, id: impl Into<String>) {
        if let Some(drag) = self.active.as_mut() {
            drag.id = id.into();
        }
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|drag| drag.id.as_str())
    }

    pub fn active_table(&self) -> Option<TableId> {
        active_table_id(self.active_id())
    }

    /// Offset from the press point, while dragging.
    pub fn offset(&self) -> Option<(i32, i32)> {
        self.active
            .as_ref()
            .map(|drag| (drag.current.0 - drag.origin.0, drag.current.1 - drag.origin.1))
    }
}

/// Number of whole cells an offset snaps to.
fn snap(delta: i32, cell: u16) -> i32 {
    let cell = i32::from(cell.max(1));
    (delta + cell / 2).div_euclid(cell)
}

/// The schedule moved by a drop offset, snapped to the nearest cell.
/// Keeps duration, room and lecture; fails rather than clamping when the
/// block would leave the grid.
pub fn resolve_drop(schedule: &Schedule, dx: i32, dy: i32, metrics: &GridMetrics) -> Result<Schedule> {
    let out = || TimetableError::OutOfBounds { x: dx, y: dy };
    let columns = snap(dx, metrics.column_width);
    let rows = snap(dy, metrics.row_height);
    let day = usize::try_from(schedule.day.index() as i32 + columns)
        .ok()
        .and_then(Day::from_index)
        .ok_or_else(out)?;
    let range = schedule.range.shifted(rows).map_err(|_| out())?;
    Ok(Schedule {
        day,
        range,
        ..schedule.clone()
    })
}
