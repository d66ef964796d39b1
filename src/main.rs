#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::{self, stdout};
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use equipdesk::api::HttpEquipmentApi;
use equipdesk::config::AppConfig;
use equipdesk::logging;
use equipdesk::tui::{App, AppError};

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let _log_guard = logging::init(&config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        "starting equipdesk"
    );

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let api = Arc::new(HttpEquipmentApi::new(config.base_url.as_str()));
    let mut app = App::new(api);
    let result = app.run(&mut terminal).await;

    let restore_result = restore_terminal();
    match result {
        Err(e) => Err(e),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
