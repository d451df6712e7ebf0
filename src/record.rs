use crate::error::ContainerError;
use crate::hash_table::TableConfig;
use crate::mapping::Mapping;
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Numeric fields a ranking can be keyed on.
pub trait Rankable {
    /// Stable identifier used to look rankings back up.
    fn sku(&self) -> &str;

    /// Units sold over the record's lifetime.
    fn items_sold(&self) -> f64;

    /// Fractional discount, 0.0 for none.
    fn discount_rate(&self) -> f64;

    fn reviews_count(&self) -> f64;

    /// Average units sold per day, as measured by the sales history.
    fn sales_velocity(&self) -> f64;
}

/// A product row as handed over by the storage layer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: u64,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub discount_rate: f64,
    #[serde(default)]
    pub reviews_count: u64,
    #[serde(default)]
    pub items_sold_count: u64,
    /// Units per day over the storage layer's sales window
    #[serde(default, alias = "sales_velocity_per_day")]
    pub sales_velocity: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub reorder_level: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl ProductRecord {
    /// At or below the reorder level, when a positive level is set.
    pub fn is_low_stock(&self) -> bool {
        self.reorder_level > 0 && self.quantity <= self.reorder_level
    }
}

impl Rankable for ProductRecord {
    fn sku(&self) -> &str {
        &self.sku
    }

    fn items_sold(&self) -> f64 {
        self.items_sold_count as f64
    }

    fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    fn reviews_count(&self) -> f64 {
        self.reviews_count as f64
    }

    fn sales_velocity(&self) -> f64 {
        self.sales_velocity
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Failed to read records at {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse records at {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Failed to index records: {0}")]
    Index(#[from] ContainerError),
}

/// Load the active products from a JSON array file.
///
/// Inactive rows are skipped. When a SKU appears more than once the later row
/// replaces the earlier one in place. `table` sizes the SKU index used for that.
pub fn load_records(
    path: &Path,
    table: TableConfig,
) -> Result<Sequence<ProductRecord>, RecordError> {
    let file = File::open(path).map_err(|e| RecordError::Io(path.to_path_buf(), e))?;
    let rows: Vec<ProductRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| RecordError::Parse(path.to_path_buf(), e))?;

    let total = rows.len();
    let records = dedupe_active(rows, table)?;

    tracing::info!(
        path = %path.display(),
        total,
        active = records.len(),
        "loaded product records"
    );

    Ok(records)
}

fn dedupe_active(
    rows: Vec<ProductRecord>,
    table: TableConfig,
) -> Result<Sequence<ProductRecord>, ContainerError> {
    let mut records = Sequence::with_capacity(rows.len());
    let mut positions: Mapping<String, usize> = Mapping::with_config(table)?;

    for row in rows.into_iter().filter(|row| row.is_active) {
        match positions.get(row.sku.as_str()) {
            Ok(&index) => {
                tracing::warn!(sku = %row.sku, "duplicate sku, keeping the later row");
                records.set(index, row)?;
            }
            Err(_) => {
                positions.set(row.sku.clone(), records.len());
                records.append(row);
            }
        }
    }

    Ok(records)
}

/// Groups records by category, each group in input order.
pub fn group_by_category(records: &[ProductRecord]) -> Mapping<String, Sequence<&ProductRecord>> {
    let mut groups: Mapping<String, Sequence<&ProductRecord>> = Mapping::new();

    for record in records {
        match groups.get_mut(record.category.as_str()) {
            Ok(group) => group.append(record),
            Err(_) => {
                groups.set(record.category.clone(), Sequence::from(vec![record]));
            }
        }
    }

    groups
}
