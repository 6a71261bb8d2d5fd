//! Terminal User Interface
//!
//! Ratatui shell around the wizard: terminal setup/teardown, the event
//! loop, and rendering. All wizard transitions run on this loop.

pub mod app;
pub mod events;
pub mod render;

use crate::client::PredictionClient;
use crate::config::Config;
use anyhow::{Context, Result};
use app::App;
use events::EventHandler;
use std::sync::Arc;

/// Run the interactive wizard until the user quits
pub async fn run(config: &Config) -> Result<()> {
    let client = Arc::new(
        PredictionClient::new(&config.backend.base_url)
            .context("Failed to build prediction client")?,
    );
    tracing::info!(backend = %client.base_url(), "starting wizard");

    let mut handler = EventHandler::new();
    EventHandler::start_terminal_listener(handler.sender());
    let mut app = App::new(client, handler.sender());

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &mut handler).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    handler: &mut EventHandler,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| render::render(f, app))
            .context("Failed to draw frame")?;

        let Some(event) = handler.next().await else {
            break;
        };
        app.handle_event(event);

        if app.should_quit {
            break;
        }
    }
    tracing::info!("wizard closed");
    Ok(())
}
