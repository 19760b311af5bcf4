pub mod color;
pub mod drag;
pub mod geometry;

pub use color::{LectureColors, PALETTE, color_for};
pub use drag::{DragId, DragRelease, DragSession, active_table_id, decode_drag_id, encode_drag_id, resolve_drop};
pub use geometry::{
    DAYTIME_SLOTS, DurationClass, GridMetrics, SLOT_COUNT, TimeSlot, cell_at, cell_rect,
    cell_rect_by_label, format_clock_label, grid_size, time_slots,
};
