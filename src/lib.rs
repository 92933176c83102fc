use std::collections::HashMap;

use anyhow::Error;

pub mod classify;
pub mod emit;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod rules;
pub mod select;

use classify::{classify, country_of};
use model::{AssetRecord, AssetType, Security};
use normalize::SecurityRow;
use rules::Rules;

pub type Result<T> = std::result::Result<T, Error>;

pub const INPUT_FILES: [&str; 3] = [
    "ISIN:NAVN/aktiekurser–sedanskeaktiermedmere_6.2.2026_217.csv",
    "ISIN:NAVN/etf'er–børshandledefonde_6.2.2026_219.csv",
    "ISIN:NAVN/fondsliste_6.2.2026_219.csv",
];

pub const OUTPUT_JSON: &str = "src/data/coreAssets.json";
pub const OUTPUT_LOOKUP_TABLE: &str = "src/constants/isinMapper.ts";

const BANNER_WIDTH: usize = 50;

pub fn classify_row(row: SecurityRow, rules: &Rules) -> Security {
    let asset_type = classify(&row.name, &row.isin, rules);
    let currency = row
        .currency
        .unwrap_or_else(|| rules.default_currency.clone());
    Security {
        record: AssetRecord {
            country: country_of(&row.isin),
            isin: row.isin,
            name: row.name,
            ticker: row.ticker,
            currency,
            asset_type,
        },
        market_cap: row.market_cap,
    }
}

pub fn classify_rows(rows: Vec<SecurityRow>, rules: &Rules) -> Vec<Security> {
    rows.into_iter().map(|r| classify_row(r, rules)).collect()
}

pub fn into_records(securities: Vec<Security>) -> Vec<AssetRecord> {
    securities.into_iter().map(|s| s.record).collect()
}

/// Count per asset type, largest first; ties keep enumeration order.
pub fn type_distribution(records: &[AssetRecord]) -> Vec<(AssetType, usize)> {
    let mut counts: HashMap<AssetType, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.asset_type).or_default() += 1;
    }
    let mut dist: Vec<(AssetType, usize)> = AssetType::ALL
        .into_iter()
        .filter_map(|t| counts.get(&t).map(|&n| (t, n)))
        .collect();
    dist.sort_by(|a, b| b.1.cmp(&a.1));
    dist
}

pub fn print_banner(title: &str) {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!("{title}");
    println!("{}", "=".repeat(BANNER_WIDTH));
}

pub fn print_distribution(records: &[AssetRecord]) {
    for (asset_type, count) in type_distribution(records) {
        println!("{:<26}{:>6}", asset_type.as_str(), count);
    }
}

pub fn print_outputs(record_count: usize) {
    println!();
    print_banner("DONE!");
    println!("   → {OUTPUT_JSON} ({record_count} records)");
    println!("   → {OUTPUT_LOOKUP_TABLE} ready for the frontend");
}
