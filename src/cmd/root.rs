use crate::data::{AppSettings, EventStore, persistence::get_data_dir};
use crate::ui::calendar_view::{App, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;

pub fn run() -> Result<()> {
    let settings = AppSettings::load()?;
    let store = EventStore::open(&get_data_dir()?)?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("daycal panicked: {info}");
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let today = Local::now().date_naive();
    tracing::info!(%today, "starting interactive calendar");
    let mut app = App::new(store, settings, today);

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    tracing::info!(
        events = app.store().event_count(),
        "interactive calendar closed"
    );

    result
}
