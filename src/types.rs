use crate::sequence::Sequence;
use serde::Serialize;
use std::fmt;

/// Which field a ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMode {
    Popularity,
    Discount,
    Weighted,
    Velocity,
}

impl RankMode {
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "popularity" => Some(RankMode::Popularity),
            "discount" => Some(RankMode::Discount),
            "weighted" => Some(RankMode::Weighted),
            "velocity" => Some(RankMode::Velocity),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RankMode::Popularity => "Units sold",
            RankMode::Discount => "Discount rate",
            RankMode::Weighted => "Popularity score",
            RankMode::Velocity => "Units per day",
        }
    }
}

impl fmt::Display for RankMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RankMode::Popularity => "popularity",
            RankMode::Discount => "discount",
            RankMode::Weighted => "weighted",
            RankMode::Velocity => "velocity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub mode: RankMode,
    pub total_products: usize,
    pub rows: Sequence<RankedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub rank: usize,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub totals: Totals,
    pub categories: Sequence<CategorySummary>,
    pub rows: Sequence<ReportRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub product_count: usize,
    pub low_stock_count: usize,
    pub units_in_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub product_count: usize,
    pub low_stock_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub discount_rate: f64,
    pub reviews_count: u64,
    pub items_sold_count: u64,
    pub quantity: i64,
    pub reorder_level: i64,
    pub low_stock: bool,
    pub sales_velocity_per_day: f64,
    pub popularity_rank: Option<usize>,
    pub popularity_score: f64,
    pub discount_rank: Option<usize>,
    pub discount_value: f64,
}
