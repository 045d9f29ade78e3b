use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, WrapErr};
use gpui::*;
use gpui_hydrograph::{feed, Chart, ClearFocus, HydrographConfig, HydrographView, SiteLegend};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Interactive hydrograph of gage readings.
#[derive(Parser, Debug)]
#[command(name = "hydrograph")]
#[command(version)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Observation array, file path or http(s) URL (overrides config).
    #[arg(short, long)]
    data: Option<String>,

    /// Render once without a window and write the SVG snapshot here.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Outline the hover regions.
    #[arg(long)]
    show_cells: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => HydrographConfig::from_toml_file(path)?,
        None => HydrographConfig::default(),
    };
    if let Some(data) = args.data {
        config.data_path = data;
    }
    config.validate()?;
    if config.data_path.is_empty() {
        eyre::bail!("no observation source given, use --data or set data_path in the config");
    }

    if let Some(out) = &args.svg {
        let data = feed::load_observations(&config.data_path)?;
        let chart = Chart::with_data(config, SiteLegend::new(), data);
        let svg = chart.surface().map(|s| s.to_svg()).unwrap_or_default();
        std::fs::write(out, svg).wrap_err_with(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), "svg written");
        return Ok(());
    }

    let show_cells = args.show_cells;
    Application::new().run(move |cx: &mut App| {
        cx.bind_keys([KeyBinding::new("escape", ClearFocus, Some("Hydrograph"))]);

        let opened = cx.open_window(WindowOptions::default(), move |_window, cx| {
            cx.new(|cx| {
                let mut view = HydrographView::new(config, cx);
                view.show_cells = show_cells;
                view.load(cx);
                view
            })
        });
        if let Err(err) = opened {
            error!("failed to open window: {:#}", err);
            cx.quit();
        }
    });
    Ok(())
}
