use std::collections::HashSet;

use crate::loader::CsvTable;

pub const ISIN_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Ticker,
    Isin,
    Currency,
    Country,
    MarketCap,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Name,
        Column::Ticker,
        Column::Isin,
        Column::Currency,
        Column::Country,
        Column::MarketCap,
    ];

    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim() {
            "Navn" | "Navn (kort)" | "Name" => Some(Column::Name),
            "Ticker" | "Symbol" => Some(Column::Ticker),
            "ISIN" => Some(Column::Isin),
            "Valuta" | "Currency" => Some(Column::Currency),
            "Land" | "Country" => Some(Column::Country),
            "Market Cap" | "Markedsværdi" => Some(Column::MarketCap),
            _ => None,
        }
    }
}

/// A cleaned input row, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityRow {
    pub isin: String,
    pub name: String,
    pub ticker: Option<String>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub market_cap: f64,
}

#[derive(Debug, Default)]
struct ColumnIndices {
    name: Option<usize>,
    ticker: Option<usize>,
    isin: Option<usize>,
    currency: Option<usize>,
    country: Option<usize>,
    market_cap: Option<usize>,
}

impl ColumnIndices {
    fn from_headers(headers: &[String]) -> Self {
        let mut indices = Self::default();
        for (pos, h) in headers.iter().enumerate() {
            let slot = match Column::from_header(h) {
                Some(Column::Name) => &mut indices.name,
                Some(Column::Ticker) => &mut indices.ticker,
                Some(Column::Isin) => &mut indices.isin,
                Some(Column::Currency) => &mut indices.currency,
                Some(Column::Country) => &mut indices.country,
                Some(Column::MarketCap) => &mut indices.market_cap,
                None => continue,
            };
            slot.get_or_insert(pos);
        }
        indices
    }
}

fn cell(row: &[String], index: Option<usize>) -> Option<String> {
    let value = row.get(index?)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Lenient numeric parse; anything unusable counts as zero.
pub fn parse_market_cap(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.,
    }
}

pub fn is_valid_isin(isin: &str) -> bool {
    isin.chars().count() == ISIN_LEN
}

fn clean_row(row: &[String], indices: &ColumnIndices) -> Option<SecurityRow> {
    let isin = cell(row, indices.isin)?.to_uppercase();
    if !is_valid_isin(&isin) {
        return None;
    }
    let name = cell(row, indices.name)?;
    Some(SecurityRow {
        isin,
        name,
        ticker: cell(row, indices.ticker),
        currency: cell(row, indices.currency),
        country: cell(row, indices.country),
        market_cap: cell(row, indices.market_cap)
            .map(|v| parse_market_cap(&v))
            .unwrap_or(0.),
    })
}

/// Maps every table onto the canonical columns, drops rows without a
/// 12-character ISIN or a name, and keeps the first row per ISIN.
pub fn normalize(tables: &[CsvTable]) -> Vec<SecurityRow> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for table in tables {
        let indices = ColumnIndices::from_headers(&table.headers);
        for row in table.rows.iter() {
            let Some(security) = clean_row(row, &indices) else {
                continue;
            };
            if seen.insert(security.isin.clone()) {
                out.push(security);
            }
        }
    }
    out
}

/// Canonical columns present across the loaded tables, for the run report.
pub fn detected_columns(tables: &[CsvTable]) -> Vec<Column> {
    Column::ALL
        .into_iter()
        .filter(|c| {
            tables
                .iter()
                .flat_map(|t| t.headers.iter())
                .any(|h| Column::from_header(h) == Some(*c))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TextEncoding;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            source: "test.csv".into(),
            encoding: TextEncoding::Utf8,
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn maps_header_aliases() {
        assert_eq!(Column::from_header("Navn (kort)"), Some(Column::Name));
        assert_eq!(Column::from_header(" Symbol "), Some(Column::Ticker));
        assert_eq!(Column::from_header("Market Cap"), Some(Column::MarketCap));
        assert_eq!(Column::from_header("Kurs"), None);
    }

    #[test]
    fn drops_malformed_rows() {
        let t = table(
            &["Navn", "ISIN", "Ticker"],
            &[
                &["Novo Nordisk B", " dk0062498333 ", "NOVO B"],
                &["Too short", "DK006249833", "X"],
                &["", "DK0060094928", "ORSTED"],
                &["No isin"],
            ],
        );
        let rows = normalize(&[t]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].isin, "DK0062498333");
        assert_eq!(rows[0].ticker.as_deref(), Some("NOVO B"));
        assert_eq!(rows[0].currency, None);
    }

    #[test]
    fn first_occurrence_wins_across_tables() {
        let stocks = table(&["Name", "ISIN"], &[&["Apple Inc", "US0378331005"]]);
        let etfs = table(
            &["Navn", "ISIN", "Valuta"],
            &[&["Apple duplicate", "US0378331005", "USD"], &["SPDR S&P 500 ETF", "US78462F1030", "USD"]],
        );
        let rows = normalize(&[stocks, etfs]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Apple Inc");
        assert_eq!(rows[1].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn first_aliased_header_wins() {
        let t = table(
            &["Navn (kort)", "Navn", "ISIN"],
            &[&["NOVO", "Novo Nordisk B", "DK0062498333"]],
        );
        assert_eq!(normalize(&[t])[0].name, "NOVO");
    }

    #[test]
    fn market_cap_parsing() {
        assert_eq!(parse_market_cap("1234.5"), 1234.5);
        assert_eq!(parse_market_cap(" 1 000 "), 1000.);
        assert_eq!(parse_market_cap("2e9"), 2e9);
        assert_eq!(parse_market_cap("n/a"), 0.);
        assert_eq!(parse_market_cap("NaN"), 0.);
        assert_eq!(parse_market_cap(""), 0.);
    }

    #[test]
    fn reports_detected_columns() {
        let t = table(&["Navn", "ISIN", "Kurs"], &[]);
        assert_eq!(detected_columns(&[t]), vec![Column::Name, Column::Isin]);
    }
}
