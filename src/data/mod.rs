pub mod app_settings;
pub mod lecture;
pub mod persistence;
pub mod schedule;
pub mod seed;
pub mod store;
pub mod table_id;
pub mod view;

pub use app_settings::AppSettings;
pub use lecture::Lecture;
pub use persistence::Persistable;
pub use schedule::{DAY_LABELS, Day, Schedule, SlotRange};
pub use seed::{SeedData, SeedTable};
pub use store::{Entries, EntryId, ScheduleEntry, ScheduleStore};
pub use table_id::{DRAG_ID_SEPARATOR, TableId};
pub use view::{TableView, ViewBinder};
