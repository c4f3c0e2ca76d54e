use clap::Parser;
use glassdoor_scrap::config::{Cli, Config};
use glassdoor_scrap::{process::process_site, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_cli(cli)?;
    process_site(config).await?;

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},headless_chrome=warn,html5ever=warn")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
