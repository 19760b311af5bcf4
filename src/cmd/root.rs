use anyhow::Result;
use timetable::data::persistence::get_data_dir;
use timetable::data::{AppSettings, SeedData};
use timetable::ui::timetable_view::{App, run_app};
use timetable::ui::{restore_terminal, setup_terminal};
use tracing::info;

pub fn run() -> Result<()> {
    let settings = AppSettings::load()?;
    let seed = SeedData::load_or_builtin(&get_data_dir()?)?;
    let catalog = seed.lectures();
    let store = seed.into_store()?;
    info!(tables = store.len(), lectures = catalog.len(), "session started");

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, catalog, settings);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    // Session state is discarded on exit
    info!(tables = app.store().len(), "session ended");

    result
}
