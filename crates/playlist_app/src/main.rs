mod app;
mod cli;
mod logging;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use playlist_engine::CatalogSettings;

use crate::app::App;
use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log_to, &cli.data_dir, cli.verbose);

    let settings = CatalogSettings {
        base_url: cli.api_base,
        request_timeout: Duration::from_secs(cli.timeout_secs),
        ..CatalogSettings::default()
    };
    let mut app = App::open(&cli.data_dir, settings)?;
    let mut stdout = std::io::stdout().lock();
    app.run(cli.command, &mut stdout)
}
