use crate::types::{CategorySummary, InventoryReport, RankedRow, RankingReport, ReportRow, Totals};
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const BOX_TL: &str = "╭";
const BOX_TR: &str = "╮";
const BOX_BL: &str = "╰";
const BOX_BR: &str = "╯";
const BOX_H: &str = "─";
const BOX_V: &str = "│";

const HEADER_WIDTH: usize = 62;

pub struct TerminalRenderer {
    use_color: bool,
    verbose: bool,
}

impl TerminalRenderer {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    pub fn render_ranking(&self, report: &RankingReport) {
        println!();
        self.print_header(
            &format!("Top products by {}", report.mode),
            &format!(
                "Showing {} of {} products",
                report.rows.len(),
                report.total_products
            ),
        );
        println!();

        if report.rows.is_empty() {
            println!("  {}", self.paint("No products found.", Tone::Muted));
            println!();
            return;
        }

        println!(
            "  {}",
            self.paint(
                &format!(
                    "{:>4}  {:<10}  {:<28}  {:>14}",
                    "#",
                    "SKU",
                    "Name",
                    report.mode.label()
                ),
                Tone::Heading
            )
        );
        println!("  {}", self.paint(&BOX_H.repeat(62), Tone::Muted));

        for row in report.rows.iter() {
            self.print_ranked_row(row);
        }
        println!();
    }

    pub fn render_inventory(&self, report: &InventoryReport) {
        println!();
        self.print_header("Inventory Report", &Self::totals_line(&report.totals));
        println!();

        self.print_categories(report.categories.as_slice());

        if report.rows.is_empty() {
            println!();
            println!("  {}", self.paint("No products found.", Tone::Muted));
            println!();
            return;
        }

        println!();
        println!(
            "  {}",
            self.paint(
                &format!(
                    "{:<10}  {:<24}  {:>9}  {:>7}  {:>7}  {:>6}  {:>6}  {:>5}",
                    "SKU", "Name", "Price", "Qty", "Vel/d", "Pop#", "Disc#", "Low"
                ),
                Tone::Heading
            )
        );
        println!("  {}", self.paint(&BOX_H.repeat(91), Tone::Muted));

        for row in report.rows.iter() {
            if self.verbose || row.low_stock {
                self.print_report_row(row);
            }
        }

        if !self.verbose {
            println!();
            println!(
                "  {}",
                self.paint(
                    "Only low-stock products are listed; use --verbose for all rows.",
                    Tone::Muted
                )
            );
        }
        println!();
    }

    fn print_header(&self, title: &str, subtitle: &str) {
        println!(
            "  {}{}{}",
            self.paint(BOX_TL, Tone::Muted),
            self.paint(&BOX_H.repeat(HEADER_WIDTH), Tone::Muted),
            self.paint(BOX_TR, Tone::Muted)
        );

        for (text, tone) in [(title, Tone::Title), (subtitle, Tone::Plain)] {
            let line = Self::fit(&format!("  {}", text), HEADER_WIDTH - 2);
            let padding = (HEADER_WIDTH - 1).saturating_sub(line.chars().count());
            println!(
                "  {} {}{}{}",
                self.paint(BOX_V, Tone::Muted),
                self.paint(&line, tone),
                " ".repeat(padding),
                self.paint(BOX_V, Tone::Muted)
            );
        }

        println!(
            "  {}{}{}",
            self.paint(BOX_BL, Tone::Muted),
            self.paint(&BOX_H.repeat(HEADER_WIDTH), Tone::Muted),
            self.paint(BOX_BR, Tone::Muted)
        );
    }

    fn print_ranked_row(&self, row: &RankedRow) {
        let rank = format!("{:>4}", row.rank);
        let sku = format!("{:<10}", Self::fit(&row.sku, 10));
        let name = format!("{:<28}", Self::fit(&row.name, 28));
        let score = format!("{:>14}", Self::format_score(row.score));

        // Podium positions stand out
        let rank_tone = if row.rank <= 3 { Tone::Podium } else { Tone::Muted };

        println!(
            "  {}  {}  {}  {}",
            self.paint(&rank, rank_tone),
            self.paint(&sku, Tone::Sku),
            name,
            self.paint(&score, Tone::Score)
        );

        if self.verbose && !row.category.is_empty() {
            println!(
                "        {}",
                self.paint(&format!("└─ {}", row.category), Tone::Muted)
            );
        }
    }

    fn print_report_row(&self, row: &ReportRow) {
        let rank = |r: Option<usize>| r.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
        let line = format!(
            "{:<10}  {:<24}  {:>9.2}  {:>7}  {:>7.2}  {:>6}  {:>6}  {:>5}",
            Self::fit(&row.sku, 10),
            Self::fit(&row.name, 24),
            row.price,
            row.quantity,
            row.sales_velocity_per_day,
            rank(row.popularity_rank),
            rank(row.discount_rank),
            if row.low_stock { "yes" } else { "" }
        );

        if row.low_stock {
            println!("  {}", self.paint(&line, Tone::Alert));
        } else {
            println!("  {}", line);
        }
    }

    fn print_categories(&self, categories: &[CategorySummary]) {
        if categories.is_empty() {
            return;
        }

        let label_width = categories
            .iter()
            .map(|c| c.category.chars().count())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "  {}",
            self.paint(
                &format!(
                    "{:<width$}  {:>8}  {:>9}",
                    "Category",
                    "Products",
                    "Low stock",
                    width = label_width
                ),
                Tone::Heading
            )
        );

        for summary in categories {
            let label = if summary.category.is_empty() {
                "(none)"
            } else {
                summary.category.as_str()
            };
            let low_tone = if summary.low_stock_count > 0 {
                Tone::Alert
            } else {
                Tone::Muted
            };

            println!(
                "  {}  {}  {}",
                format!("{:<width$}", label, width = label_width),
                self.paint(&format!("{:>8}", summary.product_count), Tone::Count),
                self.paint(&format!("{:>9}", summary.low_stock_count), low_tone)
            );
        }
    }

    fn totals_line(totals: &Totals) -> String {
        format!(
            "Products: {}  │  Low stock: {}  │  Units: {}",
            totals.product_count, totals.low_stock_count, totals.units_in_stock
        )
    }

    fn format_score(score: f64) -> String {
        if score.fract() == 0.0 && score.abs() < 1e15 {
            format!("{:.0}", score)
        } else {
            format!("{:.4}", score)
        }
    }

    fn fit(text: &str, width: usize) -> String {
        if text.chars().count() <= width {
            return text.to_string();
        }
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.use_color {
            return text.to_string();
        }

        let painted = match tone {
            Tone::Plain => text.white(),
            Tone::Muted => text.bright_black(),
            Tone::Heading => text.white().bold(),
            Tone::Title => text.cyan().bold(),
            Tone::Sku => text.cyan(),
            Tone::Score => text.green(),
            Tone::Count => text.blue(),
            Tone::Podium => text.yellow().bold(),
            Tone::Alert => text.red(),
        };
        painted.to_string()
    }
}

/// Roles a piece of terminal output can play; each maps to one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    /// Box frames, separators and hints
    Muted,
    Heading,
    Title,
    Sku,
    Score,
    Count,
    /// Top three ranks
    Podium,
    /// Low stock
    Alert,
}

pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Pretty-prints `value` to `output_file`, or to stdout when none is given.
    pub fn render<T: Serialize>(&self, value: &T, output_file: Option<&Path>) -> io::Result<()> {
        match output_file {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(&mut writer, value)?;
                writeln!(writer)?;
                writer.flush()
            }
            None => {
                let mut stdout = io::stdout().lock();
                serde_json::to_writer_pretty(&mut stdout, value)?;
                writeln!(stdout)
            }
        }
    }
}
