use crate::data::store::{Entries, ScheduleEntry, ScheduleStore};
use crate::data::{Day, Schedule, TableId};
use crate::grid::drag::{DragSession, active_table_id, encode_drag_id};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Read-only projection of one table for a single render pass.
///
/// Positions handed out by a view are only valid until the next store mutation.
#[derive(Clone, Debug)]
pub struct TableView {
    table_id: TableId,
    entries: Entries,
    active_drag: Option<String>,
}

impl TableView {
    pub fn new(table_id: TableId, entries: Entries, drag: &DragSession) -> Self {
        TableView {
            table_id,
            entries,
            active_drag: drag.active_id().map(str::to_string),
        }
    }

    pub fn table_id(&self) -> &TableId {
        &self.table_id
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn schedules(&self) -> impl Iterator<Item = &Schedule> {
        self.entries.iter().map(|e| &e.schedule)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drag id of the entry at `index` in this view.
    pub fn drag_id(&self, index: usize) -> String {
        encode_drag_id(&self.table_id, index)
    }

    /// True while a drag that started in this table is in flight.
    pub fn is_highlighted(&self) -> bool {
        active_table_id(self.active_drag.as_deref()).as_ref() == Some(&self.table_id)
    }

    pub fn is_dragging(&self, index: usize) -> bool {
        self.active_drag.as_deref() == Some(self.drag_id(index).as_str())
    }

    /// Position of the block drawn on top at (day, slot): the last entry covering it.
    pub fn entry_at(&self, day: Day, slot: u8) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| e.schedule.occupies(day, slot))
    }

    fn is_current(&self, entries: &Entries, drag: &DragSession) -> bool {
        let same_entries =
            Arc::ptr_eq(&self.entries, entries) || (self.entries.is_empty() && entries.is_empty());
        same_entries && self.active_drag.as_deref() == drag.active_id()
    }
}

/// Memoizes one `TableView` per table. A view is rebuilt only when the store
/// swapped that table's sequence or the drag session changed.
#[derive(Debug, Default)]
pub struct ViewBinder {
    views: HashMap<TableId, TableView>,
    rebuilds: usize,
}

impl ViewBinder {
    pub fn view_for(
        &mut self,
        store: &ScheduleStore,
        table_id: &TableId,
        drag: &DragSession,
    ) -> &TableView {
        let entries = store.entries(table_id);
        let stale = self
            .views
            .get(table_id)
            .is_none_or(|view| !view.is_current(&entries, drag));
        if stale {
            self.rebuilds += 1;
            debug!(table = %table_id, rebuilds = self.rebuilds, "rebuild view");
            self.views.insert(
                table_id.clone(),
                TableView::new(table_id.clone(), entries, drag),
            );
        }
        &self.views[table_id]
    }

    /// Forgets views of tables that are no longer in the store.
    pub fn retain(&mut self, store: &ScheduleStore) {
        self.views.retain(|id, _| store.contains(id));
    }

    /// How many views have been built so far.
    #[cfg(test)]
    pub(crate) fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}
