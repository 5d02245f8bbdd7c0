mod app;
mod family;
mod layout;
mod util;

use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the hosted members store.
    #[arg(long, default_value = "http://localhost:8090")]
    backend_url: String,

    /// Family slug scoping every member request.
    #[arg(long, default_value = "default")]
    family: String,

    /// Seconds between full member-list refreshes.
    #[arg(long, default_value_t = 3)]
    poll_interval_secs: u64,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = app::AppConfig {
        backend_url: args.backend_url,
        family: args.family,
        poll_interval: Duration::from_secs(args.poll_interval_secs.max(1)),
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "kintree",
        options,
        Box::new(move |cc| Ok(Box::new(app::KinTreeApp::new(cc, config)?))),
    )
}
