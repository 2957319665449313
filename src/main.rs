use clap::Parser;
use log::info;

use lsrl_sim::{config::Args, logging, LsrlApp};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_native_log(args.verbose);

    let config = args.load_config()?;
    info!("starting with {:?}", config);

    let native_options = LsrlApp::native_options(&config);
    let app = LsrlApp::new(config)?;
    eframe::run_native(
        "LSRL Simulation",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    );
    Ok(())
}
