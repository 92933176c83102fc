use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::Result;

pub const RULES_FILE: &str = "isin_rules.toml";

const DOMESTIC_COUNTRY: &str = "DK";
const DEFAULT_CURRENCY: &str = "DKK";
const ETF_TOKENS: &[&str] = &["ETF", "EXCHANGE TRADED", "UCITS", "XACT"];
const BOND_TOKENS: &[&str] = &["BOND", "OBLIGATION", "FIXED"];
const APPROVED_INDEX_KEYWORDS: &[&str] =
    &["MSCI", "S&P", "CORE", "WORLD", "NASDAQ", "SPARINDEX", "STOXX"];
const FUND_TOKENS: &[&str] = &["INVESTERINGSFORENING", "INV."];
const ACCUMULATING_TOKENS: &[&str] = &["AKK"];
const PRIMARY_FOREIGN_COUNTRY: &str = "US";
const OTHER_COUNTRIES: &[&str] = &[
    "DE", "SE", "FR", "NL", "CH", "FI", "NO", "BE", "IT", "ES", "GB", "IE",
];
const MAX_PRIMARY_FOREIGN: usize = 1000;
const MAX_OTHER_FOREIGN: usize = 300;

/// Hand-maintained keyword lists and country groupings driving
/// classification and selection. Every key may be overridden from TOML;
/// keys left out keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub domestic_country: String,
    pub default_currency: String,
    pub etf_tokens: Vec<String>,
    pub bond_tokens: Vec<String>,
    pub approved_index_keywords: Vec<String>,
    pub fund_tokens: Vec<String>,
    pub accumulating_tokens: Vec<String>,
    pub primary_foreign_country: String,
    pub other_countries: Vec<String>,
    pub max_primary_foreign: usize,
    pub max_other_foreign: usize,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            domestic_country: DOMESTIC_COUNTRY.to_string(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            etf_tokens: owned(ETF_TOKENS),
            bond_tokens: owned(BOND_TOKENS),
            approved_index_keywords: owned(APPROVED_INDEX_KEYWORDS),
            fund_tokens: owned(FUND_TOKENS),
            accumulating_tokens: owned(ACCUMULATING_TOKENS),
            primary_foreign_country: PRIMARY_FOREIGN_COUNTRY.to_string(),
            other_countries: owned(OTHER_COUNTRIES),
            max_primary_foreign: MAX_PRIMARY_FOREIGN,
            max_other_foreign: MAX_OTHER_FOREIGN,
        }
    }
}

impl Rules {
    pub fn from_toml(content: &str) -> Result<Self> {
        let rules: Rules = toml::from_str(content).context("failed to parse rules TOML")?;
        Ok(rules.normalized())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid rules file {}", path.display()))
    }

    /// Loads `path` when it exists, otherwise falls back to the built-in rules.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            println!("Using rules from {}", path.display());
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    // Matching is done on uppercased names and ISINs.
    fn normalized(mut self) -> Self {
        for list in [
            &mut self.etf_tokens,
            &mut self.bond_tokens,
            &mut self.approved_index_keywords,
            &mut self.fund_tokens,
            &mut self.accumulating_tokens,
            &mut self.other_countries,
        ] {
            list.iter_mut().for_each(|s| *s = s.trim().to_uppercase());
            list.retain(|s| !s.is_empty());
        }
        self.domestic_country = self.domestic_country.trim().to_uppercase();
        self.primary_foreign_country = self.primary_foreign_country.trim().to_uppercase();
        self.default_currency = self.default_currency.trim().to_string();
        self
    }
}
