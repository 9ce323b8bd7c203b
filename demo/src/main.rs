//! Demo binary: stamps text on a background, draws a sprite over it and
//! shows the result.

mod app;
mod bootstrap;
mod config;

use image_engine::WindowViewer;

fn main() -> anyhow::Result<()> {
    bootstrap::init_tracing();
    bootstrap::load_dotenv();

    let config = config::DemoConfig::load();
    tracing::info!(?config, "Starting sprite demo");

    app::run(&config, &mut WindowViewer::new())?;
    Ok(())
}
