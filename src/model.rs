use std::{fmt, str::FromStr};

use anyhow::Error;
use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    #[serde(alias = "ETF_POSITIVLISTE")]
    EtfOnApprovedList,
    #[serde(alias = "ETF_IKKE_POSITIVLISTE")]
    EtfNotOnApprovedList,
    #[serde(alias = "ETF_OBLIGATIONSBASERET")]
    EtfBondBased,
    #[serde(alias = "INVF_AKKUMULERENDE")]
    FundAccumulating,
    #[serde(alias = "INVF_UDBYTTEBETALTENDE")]
    FundDistributing,
    #[serde(alias = "AKTIE_DK")]
    EquityDomestic,
    #[serde(alias = "AKTIE_UDENLANDSK")]
    EquityForeign,
}

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        AssetType::EtfOnApprovedList,
        AssetType::EtfNotOnApprovedList,
        AssetType::EtfBondBased,
        AssetType::FundAccumulating,
        AssetType::FundDistributing,
        AssetType::EquityDomestic,
        AssetType::EquityForeign,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::EtfOnApprovedList => "ETF_ON_APPROVED_LIST",
            AssetType::EtfNotOnApprovedList => "ETF_NOT_ON_APPROVED_LIST",
            AssetType::EtfBondBased => "ETF_BOND_BASED",
            AssetType::FundAccumulating => "FUND_ACCUMULATING",
            AssetType::FundDistributing => "FUND_DISTRIBUTING",
            AssetType::EquityDomestic => "EQUITY_DOMESTIC",
            AssetType::EquityForeign => "EQUITY_FOREIGN",
        }
    }

    fn legacy_code(self) -> &'static str {
        match self {
            AssetType::EtfOnApprovedList => "ETF_POSITIVLISTE",
            AssetType::EtfNotOnApprovedList => "ETF_IKKE_POSITIVLISTE",
            AssetType::EtfBondBased => "ETF_OBLIGATIONSBASERET",
            AssetType::FundAccumulating => "INVF_AKKUMULERENDE",
            AssetType::FundDistributing => "INVF_UDBYTTEBETALTENDE",
            AssetType::EquityDomestic => "AKTIE_DK",
            AssetType::EquityForeign => "AKTIE_UDENLANDSK",
        }
    }

    /// ETFs and investment funds, i.e. everything that is not a plain share.
    pub fn is_fund_like(self) -> bool {
        !matches!(self, AssetType::EquityDomestic | AssetType::EquityForeign)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s || t.legacy_code() == s)
            .ok_or_else(|| Error::msg(format!("unknown asset type: {s}")))
    }
}

/// One emitted security. Field names follow the JSON consumed by the
/// frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub isin: String,
    #[serde(rename = "navn")]
    pub name: String,
    pub ticker: Option<String>,
    #[serde(rename = "valuta")]
    pub currency: String,
    #[serde(rename = "land")]
    pub country: String,
    #[serde(rename = "aktivType")]
    pub asset_type: AssetType,
}

/// A classified record plus the ranking key used by the core-list selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Security {
    pub record: AssetRecord,
    pub market_cap: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_canonical_names() {
        let json = serde_json::to_string(&AssetType::EtfBondBased).unwrap();
        assert_eq!(json, "\"ETF_BOND_BASED\"");
        for t in AssetType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn accepts_legacy_codes() {
        let t: AssetType = serde_json::from_str("\"AKTIE_DK\"").unwrap();
        assert_eq!(t, AssetType::EquityDomestic);
        assert_eq!(
            "INVF_AKKUMULERENDE".parse::<AssetType>().unwrap(),
            AssetType::FundAccumulating
        );
        assert_eq!(
            " ETF_ON_APPROVED_LIST ".parse::<AssetType>().unwrap(),
            AssetType::EtfOnApprovedList
        );
        assert!("AKTIE_UNOTERET".parse::<AssetType>().is_err());
    }

    #[test]
    fn fund_like_covers_etfs_and_funds() {
        let fund_like: Vec<_> = AssetType::ALL
            .into_iter()
            .filter(|t| t.is_fund_like())
            .collect();
        assert_eq!(fund_like.len(), 5);
        assert!(!AssetType::EquityForeign.is_fund_like());
    }

    #[test]
    fn record_uses_danish_keys() {
        let record = AssetRecord {
            isin: "DK0010274414".into(),
            name: "Novo Nordisk".into(),
            ticker: None,
            currency: "DKK".into(),
            country: "DK".into(),
            asset_type: AssetType::EquityDomestic,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["navn"], "Novo Nordisk");
        assert_eq!(value["valuta"], "DKK");
        assert_eq!(value["land"], "DK");
        assert_eq!(value["aktivType"], "EQUITY_DOMESTIC");
        assert!(value["ticker"].is_null());
    }
}
