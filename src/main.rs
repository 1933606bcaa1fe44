mod app;
mod facility;
mod geo;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// County boundary GeoJSON.
    #[arg(long, default_value = "gz_2010_us_050_00_20m.json")]
    boundaries: PathBuf,
    /// Facility roster CSV.
    #[arg(long, default_value = "facilities.csv")]
    facilities: PathBuf,
    #[arg(long, default_value_t = 1440.0)]
    width: f32,
    #[arg(long, default_value_t = 920.0)]
    height: f32,
    /// Albers USA projection scale.
    #[arg(long, default_value_t = 1300.0)]
    scale: f64,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = app::MapConfig {
        boundaries_path: args.boundaries,
        facilities_path: args.facilities,
        map_size: eframe::egui::vec2(args.width, args.height) / 1.5,
        projection_scale: args.scale,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "Facility Map",
        options,
        Box::new(move |cc| Ok(Box::new(app::FacilityMapApp::new(cc, config)))),
    )
}
