use crate::data::{
    AppSettings, Day, EntryId, Lecture, Schedule, ScheduleStore, SlotRange, TableId, TableView,
    ViewBinder,
};
use crate::error::TimetableError;
use crate::grid::{
    DragRelease, DragSession, GridMetrics, cell_at, cell_rect, color_for, encode_drag_id,
    grid_size, resolve_drop, time_slots,
};
use anyhow::Result;
use crossterm::event::{
    self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

// Border of the table a drag started from
const DROP_TARGET_COLOR: Color = Color::LightBlue;

// Evening session rows
const EVENING_BG: Color = Color::Rgb(40, 44, 52);

/// Hand-off to the add-course picker. `day`/`slot` are set when an empty cell
/// was clicked and empty for the generic "add" key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub table_id: TableId,
    pub day: Option<Day>,
    pub slot: Option<u8>,
}

#[derive(Debug, PartialEq)]
enum Mode {
    Normal,
    Picker(SearchRequest),
}

pub struct App {
    store: ScheduleStore,
    binder: ViewBinder,
    drag: DragSession,
    /// Entry under the active drag. Positions shift on removal, ids do not.
    drag_entry: Option<EntryId>,
    metrics: GridMetrics,
    /// Lectures offered by the add-course picker.
    catalog: Vec<Arc<Lecture>>,
    selected_table: usize,
    /// Entry position in the selected table. Re-derived after every removal.
    cursor: Option<usize>,
    picker_cursor: usize,
    mode: Mode,
    /// Result of the last action (message, color). Cleared on next keypress.
    status: Option<(String, Color)>,
    /// Inner grid area of each table drawn in the last frame, with its position in the store.
    table_areas: Vec<(usize, TableId, Rect)>,
}

impl App {
    pub fn new(store: ScheduleStore, catalog: Vec<Arc<Lecture>>, settings: AppSettings) -> Self {
        App {
            store,
            binder: ViewBinder::default(),
            drag: DragSession::default(),
            drag_entry: None,
            metrics: settings.grid,
            catalog,
            selected_table: 0,
            cursor: None,
            picker_cursor: 0,
            mode: Mode::Normal,
            status: None,
            table_areas: Vec::new(),
        }
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    fn selected_table_id(&self) -> Option<TableId> {
        self.store.table_ids().nth(self.selected_table).cloned()
    }

    fn select_table(&mut self, index: usize) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        self.selected_table = index % len;
        self.cursor = None;
    }

    fn report(&mut self, err: TimetableError) {
        warn!(error = %err, "mutation rejected");
        self.status = Some((err.to_string(), Color::Red));
    }

    fn notify(&mut self, msg: String) {
        self.status = Some((msg, Color::Green));
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if matches!(self.mode, Mode::Picker(_)) {
            self.handle_picker_key(code);
            return false;
        }

        // Clear the status message on every keypress
        self.status = None;

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Tab => self.select_table(self.selected_table + 1),
            KeyCode::BackTab => {
                let len = self.store.len().max(1);
                self.select_table(self.selected_table + len - 1);
            }
            KeyCode::Char('a') => self.open_picker(None),
            KeyCode::Char('d') => self.duplicate_selected(),
            KeyCode::Char('x') => self.remove_selected_table(),
            KeyCode::Up => {
                self.cursor = self.cursor.map(|i| i.saturating_sub(1));
            }
            KeyCode::Down => {
                let len = self
                    .selected_table_id()
                    .map(|id| self.store.entries(&id).len())
                    .unwrap_or(0);
                if len > 0 {
                    self.cursor = Some(self.cursor.map_or(0, |i| (i + 1).min(len - 1)));
                }
            }
            KeyCode::Delete | KeyCode::Backspace => self.delete_selected_entry(),
            KeyCode::Esc => self.cancel_drag(),
            _ => {}
        }
        false
    }

    fn handle_picker_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Up => self.picker_cursor = self.picker_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.picker_cursor + 1 < self.catalog.len() {
                    self.picker_cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Mode::Picker(request) = std::mem::replace(&mut self.mode, Mode::Normal) {
                    self.add_from_picker(request);
                }
            }
            _ => {}
        }
    }

    fn open_picker(&mut self, cell: Option<(Day, u8)>) {
        let Some(table_id) = self.selected_table_id() else {
            return;
        };
        self.picker_cursor = 0;
        self.mode = Mode::Picker(SearchRequest {
            table_id,
            day: cell.map(|(day, _)| day),
            slot: cell.map(|(_, slot)| slot),
        });
    }

    fn add_from_picker(&mut self, request: SearchRequest) {
        let Some(lecture) = self.catalog.get(self.picker_cursor).cloned() else {
            self.status = Some(("No lectures to add".to_string(), Color::Yellow));
            return;
        };
        let day = request.day.unwrap_or(Day::Mon);
        let slot = request.slot.unwrap_or(1);
        match SlotRange::new(slot, 1) {
            Ok(range) => {
                let title = lecture.title.clone();
                self.store
                    .append_item(&request.table_id, Schedule::new(day, range, "TBA", lecture));
                self.notify(format!("Added {} on {} slot {}", title, day, slot));
            }
            Err(err) => self.report(err),
        }
    }

    fn duplicate_selected(&mut self) {
        let Some(id) = self.selected_table_id() else {
            return;
        };
        match self.store.duplicate_table(&id) {
            Ok(new_id) => {
                self.select_table(self.store.len() - 1);
                self.notify(format!("Duplicated {} as {}", id, new_id));
            }
            Err(err) => self.report(err),
        }
    }

    fn remove_selected_table(&mut self) {
        if self.store.len() <= 1 {
            self.status = Some(("The last timetable cannot be removed".to_string(), Color::Yellow));
            return;
        }
        let Some(id) = self.selected_table_id() else {
            return;
        };
        self.store.remove_table(&id);
        self.binder.retain(&self.store);
        self.sync_drag();
        self.select_table(self.selected_table.min(self.store.len() - 1));
        self.notify(format!("Removed {}", id));
    }

    fn delete_selected_entry(&mut self) {
        let (Some(id), Some(index)) = (self.selected_table_id(), self.cursor) else {
            return;
        };
        let Some(entry) = self.store.entries(&id).get(index).cloned() else {
            self.cursor = None;
            return;
        };
        self.remove_schedule(&id, &entry.schedule);
        let len = self.store.entries(&id).len();
        self.cursor = if len == 0 { None } else { Some(index.min(len - 1)) };
    }

    /// Removes a block the way its delete affordance does: by day and first slot.
    fn remove_schedule(&mut self, id: &TableId, schedule: &Schedule) {
        let removed = self
            .store
            .remove_items(id, schedule.day, schedule.range.start());
        self.sync_drag();
        self.notify(format!(
            "Removed {} block(s) at {} slot {}",
            removed,
            schedule.day,
            schedule.range.start()
        ));
    }

    fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.drag_entry = None;
    }

    /// Points the drag id at the dragged entry's current position, or drops
    /// the gesture when the entry is gone.
    fn sync_drag(&mut self) {
        let (Some(table), Some(entry)) = (self.drag.active_table(), self.drag_entry) else {
            return;
        };
        match self.store.position_of(&table, entry) {
            Some(index) => self.drag.retarget(encode_drag_id(&table, index)),
            None => {
                debug!(table = %table, %entry, "dragged entry removed, drag cancelled");
                self.cancel_drag();
            }
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if matches!(self.mode, Mode::Picker(_)) {
            return;
        }
        let (x, y) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(x, y),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.drag.move_to(i32::from(x), i32::from(y))
            }
            MouseEventKind::Up(MouseButton::Left) => self.release(),
            MouseEventKind::Down(MouseButton::Right) => self.remove_at(x, y),
            _ => {}
        }
    }

    /// Table position, table id and grid cell under a screen point of the last frame.
    fn hit(&self, x: u16, y: u16) -> Option<(usize, TableId, Day, u8)> {
        let (pos, id, area) = self
            .table_areas
            .iter()
            .find(|(_, _, area)| area.contains(Position { x, y }))?;
        let (day, slot) = cell_at(
            i32::from(x - area.x),
            i32::from(y - area.y),
            &self.metrics,
        )
        .ok()?;
        Some((*pos, id.clone(), day, slot))
    }

    fn press(&mut self, x: u16, y: u16) {
        let Some((pos, id, day, slot)) = self.hit(x, y) else {
            return;
        };
        self.selected_table = pos;
        let view = self.binder.view_for(&self.store, &id, &self.drag);
        match view.entry_at(day, slot) {
            Some(index) => {
                let drag_id = view.drag_id(index);
                let entry = view.entries()[index].id;
                debug!(drag = %drag_id, %entry, "drag start");
                self.cursor = Some(index);
                self.drag_entry = Some(entry);
                self.drag.start(drag_id, i32::from(x), i32::from(y));
            }
            None => {
                self.cursor = None;
                self.open_picker(Some((day, slot)));
            }
        }
    }

    fn release(&mut self) {
        let entry = self.drag_entry.take();
        let (Some(release), Some(entry)) = (self.drag.end(), entry) else {
            return;
        };
        if release.dx == 0 && release.dy == 0 {
            return;
        }
        if let Err(err) = self.apply_drop(&release, entry) {
            self.report(err);
        }
    }

    /// Moves the dragged entry within the table it came from. The entry is
    /// found by id, so removals during the gesture cannot redirect the drop.
    fn apply_drop(&mut self, release: &DragRelease, entry_id: EntryId) -> crate::error::Result<()> {
        let target = release.target()?;
        let entries = self.store.entries(&target.table_id);
        let entry = entries
            .iter()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| TimetableError::UnknownEntry {
                table: target.table_id.to_string(),
                entry: entry_id.value(),
            })?;
        let moved = resolve_drop(&entry.schedule, release.dx, release.dy, &self.metrics)?;
        if moved == entry.schedule {
            return Ok(());
        }
        let msg = format!(
            "Moved {} to {} slot {}",
            moved.lecture.title,
            moved.day,
            moved.range.start()
        );
        self.store
            .update_entry(&target.table_id, entry_id, moved)?;
        self.notify(msg);
        Ok(())
    }

    fn remove_at(&mut self, x: u16, y: u16) {
        let Some((pos, id, day, slot)) = self.hit(x, y) else {
            return;
        };
        self.selected_table = pos;
        self.cursor = None;
        let view = self.binder.view_for(&self.store, &id, &self.drag);
        let Some(schedule) = view
            .entry_at(day, slot)
            .map(|index| view.entries()[index].schedule.clone())
        else {
            return;
        };
        self.remove_schedule(&id, &schedule);
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_tables(f, chunks[0]);
        self.render_status(f, chunks[1]);
        let area = f.area();
        if let Mode::Picker(request) = &self.mode {
            self.render_picker(f, request, area);
        }
    }

    fn render_tables(&mut self, f: &mut Frame, area: Rect) {
        self.table_areas.clear();
        let ids: Vec<TableId> = self.store.table_ids().cloned().collect();
        if ids.is_empty() {
            f.render_widget(Paragraph::new("No timetables."), area);
            return;
        }

        let size = grid_size(&self.metrics);
        let outer_width = size.width.saturating_add(2).max(1);
        let fit = usize::from((area.width / outer_width).max(1));
        // Scroll so the selected table stays on screen
        let first = self.selected_table.saturating_sub(fit - 1);
        for (column, pos) in (first..ids.len()).take(fit).enumerate() {
            let outer = Rect::new(
                area.x.saturating_add(outer_width.saturating_mul(column as u16)),
                area.y,
                outer_width,
                size.height.saturating_add(2),
            )
            .intersection(area);
            self.render_table(f, pos, &ids[pos], outer);
        }
    }

    fn render_table(&mut self, f: &mut Frame, pos: usize, id: &TableId, outer: Rect) {
        let view = self.binder.view_for(&self.store, id, &self.drag).clone();
        let (border_type, border_style) = if view.is_highlighted() {
            (
                BorderType::Double,
                Style::default()
                    .fg(DROP_TARGET_COLOR)
                    .add_modifier(Modifier::BOLD),
            )
        } else if pos == self.selected_table {
            (BorderType::Plain, Style::default().fg(Color::Yellow))
        } else {
            (BorderType::Plain, Style::default())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border_style)
            .title(format!(" Timetable {} ", pos + 1));
        let inner = block.inner(outer);
        f.render_widget(block, outer);
        self.table_areas.push((pos, id.clone(), inner));

        self.render_axes(f, inner);
        for index in 0..view.len() {
            self.render_entry(f, &view, index, pos == self.selected_table, inner);
        }
    }

    fn render_axes(&self, f: &mut Frame, inner: Rect) {
        let m = &self.metrics;
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let corner = Rect::new(0, 0, m.header_width, m.header_height);
        f.render_widget(Paragraph::new("Slot").style(bold), place(inner, corner));

        for day in Day::ALL {
            if let Ok(r) = cell_rect(day, 1, 1, m) {
                let header = Rect::new(r.x, 0, r.width, m.header_height);
                f.render_widget(
                    Paragraph::new(day.label())
                        .alignment(Alignment::Center)
                        .style(bold),
                    place(inner, header),
                );
            }
        }

        for slot in time_slots() {
            let y = m
                .header_height
                .saturating_add(m.row_height.saturating_mul(u16::from(slot.index) - 1));
            let row = Rect::new(0, y, inner.width, m.row_height);
            let style = if slot.is_evening() {
                Style::default().bg(EVENING_BG)
            } else {
                Style::default()
            };
            f.render_widget(Paragraph::new(slot.row_label()).style(style), place(inner, row));
        }
    }

    fn render_entry(&self, f: &mut Frame, view: &TableView, index: usize, selected: bool, inner: Rect) {
        let schedule = &view.entries()[index].schedule;
        let Ok(r) = cell_rect(
            schedule.day,
            schedule.range.start(),
            schedule.range.len(),
            &self.metrics,
        ) else {
            return;
        };
        // The dragged block follows the pointer
        let (dx, dy) = if view.is_dragging(index) {
            self.drag.offset().unwrap_or((0, 0))
        } else {
            (0, 0)
        };
        let shift = |v: u16, d: i32| u16::try_from((i32::from(v) + d).max(0)).unwrap_or(u16::MAX);
        let r = Rect::new(shift(r.x, dx), shift(r.y, dy), r.width, r.height);

        let lecture_id = schedule.lecture.id.as_str();
        let color = self
            .store
            .lecture_color(lecture_id)
            .unwrap_or_else(|| color_for(view.schedules(), lecture_id));
        let mut style = Style::default().fg(Color::Black).bg(color);
        if selected && self.cursor == Some(index) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if view.is_dragging(index) {
            style = style.add_modifier(Modifier::BOLD);
        }

        let text = vec![
            Line::from(Span::styled(
                schedule.lecture.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(schedule.room.clone()),
        ];
        let area = place(inner, r);
        f.render_widget(Clear, area);
        f.render_widget(Paragraph::new(text).style(style), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some((msg, color)) => Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(Span::styled(
                "Tab: next table  a: add  d: duplicate  x: remove table  \u{2191}\u{2193}: select  Del: delete  drag: move  right-click: delete  q: quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_picker(&self, f: &mut Frame, request: &SearchRequest, area: Rect) {
        let title = match (request.day, request.slot) {
            (Some(day), Some(slot)) => format!(" Add course: {} slot {} ", day, slot),
            _ => " Add course ".to_string(),
        };
        let mut lines: Vec<Line> = self
            .catalog
            .iter()
            .enumerate()
            .map(|(i, lecture)| {
                let text = format!("  {:<8} {}", lecture.id, lecture.title);
                if i == self.picker_cursor {
                    Line::from(Span::styled(
                        text,
                        Style::default().add_modifier(Modifier::REVERSED),
                    ))
                } else {
                    Line::from(text)
                }
            })
            .collect();
        if lines.is_empty() {
            lines.push(Line::from("  (no lectures)"));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )));

        let height = (lines.len() as u16).saturating_add(2);
        let width = 44;
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        )
        .intersection(area);
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
            popup,
        );
    }
}

/// Grid-relative rect moved into the table's inner area and clipped to it.
fn place(inner: Rect, r: Rect) -> Rect {
    Rect::new(
        inner.x.saturating_add(r.x),
        inner.y.saturating_add(r.y),
        r.width,
        r.height,
    )
    .intersection(inner)
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
                CEvent::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeedData;
    use ratatui::backend::TestBackend;

    fn tid(s: &str) -> TableId {
        TableId::new(s).unwrap()
    }

    fn make_app() -> App {
        let seed = SeedData::builtin();
        let catalog = seed.lectures();
        App::new(seed.into_store().unwrap(), catalog, AppSettings::default())
    }

    /// Draws one frame so mouse events can be hit-tested, returns the screen text.
    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(170, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn key(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(code, KeyModifiers::empty())
    }

    // Screen point of (day, slot) in the first table: border at (0, 0).
    fn cell(day: Day, slot: u8) -> (u16, u16) {
        let r = cell_rect(day, slot, 1, &GridMetrics::default()).unwrap();
        (r.x + 1, r.y + 1)
    }

    #[test]
    fn test_render_shows_axes_and_blocks() {
        let mut app = make_app();
        let screen = draw(&mut app);
        assert!(screen.contains("Timetable 1"));
        assert!(screen.contains("Timetable 2"));
        assert!(screen.contains("Mon"));
        assert!(screen.contains("Sat"));
        assert!(screen.contains("01 (09:00~09:30)"));
        assert!(screen.contains("24 (22:35~23:25)"));
        assert!(screen.contains("Algorithms"));
        assert_eq!(app.table_areas.len(), 2);
    }

    #[test]
    fn test_drag_moves_block_within_its_table() {
        let mut app = make_app();
        draw(&mut app);
        let (x, y) = cell(Day::Mon, 1);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        assert_eq!(app.drag.active_id(), Some("schedule-1:0"));
        assert_eq!(app.drag.active_table(), Some(tid("schedule-1")));

        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 10, y + 2));
        let screen = draw(&mut app);
        assert!(screen.contains('\u{2554}'), "drop target border is drawn double");

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 10, y + 2));
        let moved = &app.store().entries(&tid("schedule-1"))[0].schedule;
        assert_eq!(moved.day, Day::Tue);
        assert_eq!(moved.range, SlotRange::new(3, 3).unwrap());
        assert!(!app.drag.is_active());
    }

    #[test]
    fn test_drag_off_the_grid_is_rejected() {
        let mut app = make_app();
        draw(&mut app);
        let before = app.store().schedules(&tid("schedule-1"));
        let (x, y) = cell(Day::Mon, 1);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x, y + 30));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x, y + 30));
        assert_eq!(app.store().schedules(&tid("schedule-1")), before);
        assert!(matches!(app.status, Some((_, Color::Red))));
    }

    #[test]
    fn test_click_without_motion_only_selects() {
        let mut app = make_app();
        draw(&mut app);
        let before = app.store().schedules(&tid("schedule-1"));
        let (x, y) = cell(Day::Tue, 7);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x, y));
        assert_eq!(app.cursor, Some(2));
        assert_eq!(app.store().schedules(&tid("schedule-1")), before);
    }

    #[test]
    fn test_click_on_empty_cell_opens_prefilled_picker() {
        let mut app = make_app();
        draw(&mut app);
        let (x, y) = cell(Day::Sat, 10);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        assert_eq!(
            app.mode,
            Mode::Picker(SearchRequest {
                table_id: tid("schedule-1"),
                day: Some(Day::Sat),
                slot: Some(10),
            })
        );

        key(&mut app, KeyCode::Down);
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Normal);
        let entries = app.store().entries(&tid("schedule-1"));
        let added = &entries.last().unwrap().schedule;
        assert_eq!(added.day, Day::Sat);
        assert_eq!(added.range.start(), 10);
        assert_eq!(added.lecture.id, "CS305");
    }

    #[test]
    fn test_generic_add_defaults_to_first_cell() {
        let mut app = make_app();
        key(&mut app, KeyCode::Char('a'));
        key(&mut app, KeyCode::Enter);
        let entries = app.store().entries(&tid("schedule-1"));
        let added = &entries.last().unwrap().schedule;
        assert_eq!((added.day, added.range.start()), (Day::Mon, 1));
    }

    #[test]
    fn test_picker_esc_adds_nothing() {
        let mut app = make_app();
        let before = app.store().entries(&tid("schedule-1")).len();
        key(&mut app, KeyCode::Char('a'));
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.store().entries(&tid("schedule-1")).len(), before);
    }

    #[test]
    fn test_right_click_removes_block_by_first_slot() {
        let mut app = make_app();
        draw(&mut app);
        // Databases occupies Tue 7-8; clicking its second row still removes it
        let (x, y) = cell(Day::Tue, 8);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), x, y));
        let left = app.store().schedules(&tid("schedule-1"));
        assert_eq!(left.len(), 4);
        assert!(left.iter().all(|s| !(s.day == Day::Tue && s.range.contains(7))));
    }

    #[test]
    fn test_delete_key_removes_cursor_entry() {
        let mut app = make_app();
        key(&mut app, KeyCode::Down);
        key(&mut app, KeyCode::Down);
        assert_eq!(app.cursor, Some(1));
        key(&mut app, KeyCode::Delete);
        let left = app.store().schedules(&tid("schedule-1"));
        assert_eq!(left.len(), 4);
        assert!(left.iter().all(|s| s.day != Day::Wed));
        assert_eq!(app.cursor, Some(1));
    }

    #[test]
    fn test_duplicate_selects_new_table() {
        let mut app = make_app();
        key(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store().len(), 3);
        assert_eq!(app.selected_table, 2);
        let new_id = app.selected_table_id().unwrap();
        assert_eq!(
            app.store().schedules(&new_id),
            app.store().schedules(&tid("schedule-1"))
        );
    }

    #[test]
    fn test_remove_refused_for_last_table() {
        let mut app = make_app();
        key(&mut app, KeyCode::Char('x'));
        assert_eq!(app.store().len(), 1);
        key(&mut app, KeyCode::Char('x'));
        assert_eq!(app.store().len(), 1);
        assert!(matches!(app.status, Some((_, Color::Yellow))));
    }

    #[test]
    fn test_tab_cycles_tables() {
        let mut app = make_app();
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_table_id(), Some(tid("schedule-2")));
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_table_id(), Some(tid("schedule-1")));
        key(&mut app, KeyCode::BackTab);
        assert_eq!(app.selected_table_id(), Some(tid("schedule-2")));
    }

    #[test]
    fn test_deleting_dragged_block_cancels_drag() {
        let mut app = make_app();
        draw(&mut app);
        let (x, y) = cell(Day::Mon, 1);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        key(&mut app, KeyCode::Delete);
        assert!(!app.drag.is_active());

        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 20, y + 2));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 20, y + 2));
        let left = app.store().schedules(&tid("schedule-1"));
        assert_eq!(left.len(), 4);
        // The other Algorithms block stays on Wed 1-3
        assert_eq!(left[0].day, Day::Wed);
        assert_eq!(left[0].range, SlotRange::new(1, 3).unwrap());
    }

    #[test]
    fn test_drop_follows_entry_after_earlier_removal() {
        let mut app = make_app();
        draw(&mut app);
        let (x, y) = cell(Day::Tue, 7);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        assert_eq!(app.drag.active_id(), Some("schedule-1:2"));

        let (rx, ry) = cell(Day::Mon, 1);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), rx, ry));
        assert_eq!(app.drag.active_id(), Some("schedule-1:1"));

        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), x + 10, y));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 10, y));
        let left = app.store().schedules(&tid("schedule-1"));
        assert_eq!(left.len(), 4);
        assert_eq!((left[0].day, left[0].range.start()), (Day::Wed, 1));
        assert_eq!(left[1].lecture.id, "CS305");
        assert_eq!((left[1].day, left[1].range.start()), (Day::Wed, 7));
    }

    #[test]
    fn test_render_with_oversized_metrics() {
        let seed = SeedData::builtin();
        let catalog = seed.lectures();
        let mut settings = AppSettings::default();
        settings.grid.row_height = 3000;
        settings.grid.column_width = 20000;
        let mut app = App::new(seed.into_store().unwrap(), catalog, settings);
        let screen = draw(&mut app);
        assert!(screen.contains("Timetable 1"));
        assert_eq!(app.table_areas.len(), 1);
    }

    #[test]
    fn test_esc_cancels_drag() {
        let mut app = make_app();
        draw(&mut app);
        let (x, y) = cell(Day::Mon, 2);
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        key(&mut app, KeyCode::Esc);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), x + 10, y));
        assert_eq!(app.store().entries(&tid("schedule-1"))[0].schedule.day, Day::Mon);
    }

    #[test]
    fn test_q_and_ctrl_c_quit() {
        let mut app = make_app();
        assert!(key(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!key(&mut app, KeyCode::Char('c')));
    }
}
