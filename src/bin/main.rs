mod common;
use std::env::{set_var, var};
use std::error::Error;
use std::str::FromStr;

use chrono::Utc;
use clap::{arg, command, Parser};
use log::{info, trace};

use common::config::builder::ConfigContainer;
use common::config::models::{PlotSettings, RunOptions};
use common::plotter::WrfPlotter;
use wrfplot::models::plot::PlotType;
use wrfplot::version::LONG_VERSION;

#[derive(Parser, Debug)]
#[command(
    version,
    long_version=LONG_VERSION,
    about="wrfplot renders WRF model output into map images",
    long_about="wrfplot renders maximum radar reflectivity, 2 m temperature and accumulated precipitation from WRF output files into PNG maps with colorbar, logo and captions, one image per file."
)]
struct Args {
    #[arg(long, alias = "data_dir", required = true, help = "Directory with the wrfout files")]
    data_dir: String,

    #[arg(long, alias = "output_dir", default_value = "outputs", help = "Base output directory")]
    output_dir: String,

    #[arg(long, alias = "logo_path", default_value = "logo_512_39.webp", help = "Logo image")]
    logo_path: String,

    #[arg(long, default_value = "slovenia", help = "Region key")]
    region: String,

    #[arg(long, default_value_t = 6, help = "Grid label stride, 0 disables the labels")]
    stride: usize,

    #[arg(long = "type", default_value = "mdbz", help = "Plot type: mdbz, temp or precip")]
    plot_type: String,

    #[arg(long, alias = "weather_model", required = true, help = "Weather model name, used in the output path")]
    weather_model: String,

    #[arg(long, help = "Optional YAML configuration file")]
    config: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if var("RUST_LOG").is_err() {
        set_var("RUST_LOG", "info")
    }
    pretty_env_logger::init();

    let plot_type = PlotType::from_str(&args.plot_type)
        .map_err(|_| format!("Unknown plot type '{}', use mdbz, temp or precip", args.plot_type))?;

    let config = match &args.config {
        Some(path) => ConfigContainer::from_file(path)
            .map_err(|err| format!("Failed to load config: {}", err))?,
        None => ConfigContainer::default(),
    };

    let options = RunOptions {
        data_dir: args.data_dir,
        output_dir: args.output_dir,
        logo_path: args.logo_path,
        region: args.region,
        stride: Some(args.stride),
        plot_type,
        weather_model: args.weather_model,
    };
    let settings = PlotSettings::new(options, &config)?;

    info!(
        "Plotting {} for region {} ({})",
        settings.plot_type, settings.region_name, settings.weather_model
    );
    let start_time = Utc::now();

    let mut plotter = WrfPlotter::new(settings)?;
    let written = plotter.run_all()?;

    trace!("Plotting took {} seconds", Utc::now() - start_time);
    info!("{} images in {}", written, plotter.output_path().display());
    Ok(())
}
