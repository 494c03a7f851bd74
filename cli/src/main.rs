//! `bracket` entry point.

use bracket_cli::{BracketCli, BracketCliConfig, init_logging};
use bracket_core::BracketError;
use clap::Parser;

fn main() {
    let cli = BracketCli::parse();

    let config = match BracketCliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    };

    init_logging(&config, cli.verbose);
    config.validate();
    tracing::debug!(version = bracket_core::VERSION, "bracket starting");

    let code = match cli.run(&config) {
        Ok(code) => code,
        Err(e) => {
            let kind = e
                .downcast_ref::<BracketError>()
                .map_or("OTHER", |e| e.kind().as_str());
            tracing::debug!(kind, error = ?e, "command failed");
            eprintln!("error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}
