use clap::Parser;
use std::path::PathBuf;

use stockpile::config::StockpileConfig;
use stockpile::types::RankMode;

#[derive(Parser, Debug)]
#[command(name = "stockpile")]
#[command(about = "Rank products and report stock levels from an inventory export", long_about = None)]
pub struct Cli {
    /// JSON file holding an array of product records
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Ranking mode: popularity, discount, weighted, or velocity
    #[arg(long, value_name = "MODE", default_value = "popularity")]
    pub by: String,

    /// Number of ranked products to show (default from config: 10)
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Print the full inventory report instead of a ranking
    #[arg(long)]
    pub report: bool,

    /// Show verbose output and debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Output JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file (default: ~/.config/stockpile/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial bucket count of the record index
    #[arg(long, value_name = "N")]
    pub capacity: Option<usize>,

    /// Load factor at which the record index grows
    #[arg(long, value_name = "RATIO")]
    pub load_factor: Option<f64>,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if self.mode().is_none() {
            return Err(format!(
                "Invalid --by mode: {}. Must be popularity, discount, weighted, or velocity",
                self.by
            ));
        }
        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn mode(&self) -> Option<RankMode> {
        RankMode::parse(&self.by)
    }

    pub fn should_output_json(&self) -> bool {
        self.json || self.output.is_some()
    }

    /// Command-line flags take precedence over the config file.
    pub fn apply_overrides(&self, config: &mut StockpileConfig) {
        if let Some(top) = self.top {
            config.ranking.top = top;
        }
        if let Some(capacity) = self.capacity {
            config.table.initial_capacity = capacity;
        }
        if let Some(load_factor) = self.load_factor {
            config.table.load_factor = load_factor;
        }
        if self.no_color {
            config.display.color = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("stockpile").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_defaults() {
        let cli = parse(&["products.json"]);

        assert_eq!(cli.records, PathBuf::from("products.json"));
        assert_eq!(cli.mode(), Some(RankMode::Popularity));
        assert!(cli.validate().is_ok());
        assert!(!cli.should_output_json());
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let cli = parse(&["products.json", "--by", "price"]);
        assert!(cli.validate().is_err());

        let cli = parse(&["products.json", "--by", "velocity"]);
        assert_eq!(cli.mode(), Some(RankMode::Velocity));

        let cli = parse(&["products.json", "--top", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_cli_output_implies_json() {
        let cli = parse(&["products.json", "--output", "ranking.json"]);
        assert!(cli.should_output_json());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&[
            "products.json",
            "--top",
            "3",
            "--capacity",
            "64",
            "--load-factor",
            "0.5",
            "--no-color",
        ]);
        let mut config = StockpileConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config.ranking.top, 3);
        assert_eq!(config.table.initial_capacity, 64);
        assert_eq!(config.table.load_factor, 0.5);
        assert!(!config.display.color);
    }
}
