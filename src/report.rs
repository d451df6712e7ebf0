use crate::ranking::{
    build_discount_ranking, build_popularity_ranking, build_velocity_ranking,
    build_weighted_popularity_ranking, PopularityWeights, RankPosition, Ranking,
};
use crate::record::{group_by_category, ProductRecord};
use crate::sequence::Sequence;
use crate::types::{
    CategorySummary, InventoryReport, RankMode, RankedRow, RankingReport, ReportRow, Totals,
};

/// Ranks `records` by `mode` and keeps the first `top` rows.
pub fn build_ranking_report(
    records: &[ProductRecord],
    mode: RankMode,
    weights: PopularityWeights,
    top: usize,
) -> RankingReport {
    let ranking: Ranking<'_, ProductRecord> = match mode {
        RankMode::Popularity => build_popularity_ranking(records),
        RankMode::Discount => build_discount_ranking(records),
        RankMode::Weighted => build_weighted_popularity_ranking(records, weights),
        RankMode::Velocity => build_velocity_ranking(records),
    };

    let rows = ranking
        .top(top)
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankedRow {
            rank: i + 1,
            sku: entry.record.sku.clone(),
            name: entry.record.name.clone(),
            category: entry.record.category.clone(),
            score: entry.score,
        })
        .collect();

    RankingReport {
        mode,
        total_products: records.len(),
        rows,
    }
}

/// One row per product with stock signals and both rank positions.
///
/// Rows keep the input order; ranks are 1-based, highest score first.
pub fn build_inventory_report(
    records: &[ProductRecord],
    weights: PopularityWeights,
) -> InventoryReport {
    let popularity = build_weighted_popularity_ranking(records, weights).into_positions();
    let discount = build_discount_ranking(records).into_positions();

    let rows: Sequence<ReportRow> = records
        .iter()
        .map(|p| {
            let pop = popularity.get(p.sku.as_str()).ok().copied();
            let disc = discount.get(p.sku.as_str()).ok().copied();
            report_row(p, pop, disc)
        })
        .collect();

    let mut categories: Vec<CategorySummary> = group_by_category(records)
        .iter()
        .map(|(category, group)| CategorySummary {
            category: category.clone(),
            product_count: group.len(),
            low_stock_count: group.iter().filter(|p| p.is_low_stock()).count(),
        })
        .collect();
    categories.sort_by(|a, b| {
        b.low_stock_count
            .cmp(&a.low_stock_count)
            .then_with(|| a.category.cmp(&b.category))
    });

    let totals = Totals {
        product_count: records.len(),
        low_stock_count: rows.iter().filter(|r| r.low_stock).count(),
        units_in_stock: records.iter().map(|p| p.quantity.max(0)).sum(),
    };

    InventoryReport {
        totals,
        categories: Sequence::from(categories),
        rows,
    }
}

fn report_row(
    p: &ProductRecord,
    popularity: Option<RankPosition>,
    discount: Option<RankPosition>,
) -> ReportRow {
    ReportRow {
        sku: p.sku.clone(),
        name: p.name.clone(),
        category: p.category.clone(),
        price: p.price,
        min_price: p.min_price,
        max_price: p.max_price,
        discount_rate: p.discount_rate,
        reviews_count: p.reviews_count,
        items_sold_count: p.items_sold_count,
        quantity: p.quantity,
        reorder_level: p.reorder_level,
        low_stock: p.is_low_stock(),
        sales_velocity_per_day: round_to(p.sales_velocity, 4),
        popularity_rank: popularity.map(|pos| pos.rank),
        popularity_score: popularity.map(|pos| pos.score).unwrap_or(0.0),
        discount_rank: discount.map(|pos| pos.rank),
        discount_value: discount.map(|pos| pos.score).unwrap_or(0.0),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
