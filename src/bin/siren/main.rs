//! siren - terminal dub siren
//!
//! Run with: cargo run --bin siren
//! Set RUST_LOG=debug for engine diagnostics on stderr.

mod app;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let terminal = ratatui::init();
    let result = app::run(terminal);
    ratatui::restore();
    result
}
