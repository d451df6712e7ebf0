mod cli;

use clap::Parser;
use cli::Cli;
use stockpile::config::StockpileConfig;
use stockpile::output::{JsonRenderer, TerminalRenderer};
use stockpile::record::load_records;
use stockpile::report::{build_inventory_report, build_ranking_report};
use stockpile::types::RankMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(e) = cli.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    let mut config = match StockpileConfig::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    cli.apply_overrides(&mut config);

    let config = match config.validate() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let records = match load_records(&cli.records, config.table) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let use_color = config.display.color && std::io::IsTerminal::is_terminal(&std::io::stdout());
    let renderer = TerminalRenderer::new(use_color, cli.verbose);
    let weights = config.ranking.weights;

    if cli.report {
        let report = build_inventory_report(records.as_slice(), weights);

        if cli.should_output_json() {
            write_json(&report, &cli);
        } else {
            renderer.render_inventory(&report);
        }
    } else {
        let mode = cli.mode().unwrap_or(RankMode::Popularity);
        let report = build_ranking_report(records.as_slice(), mode, weights, config.ranking.top);

        if cli.should_output_json() {
            write_json(&report, &cli);
        } else {
            renderer.render_ranking(&report);
        }
    }
}

fn write_json<T: serde::Serialize>(value: &T, cli: &Cli) {
    let renderer = JsonRenderer::new();
    if let Err(e) = renderer.render(value, cli.output.as_deref()) {
        eprintln!("Error writing JSON output: {}", e);
        std::process::exit(3);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "stockpile=debug" } else { "stockpile=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
