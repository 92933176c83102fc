//! Name/ISIN heuristics mapping a security to its tax category.
//!
//! The chain is kept as data: an ordered list of rules, each pairing a
//! predicate with an outcome. An outcome is either a final asset type or a
//! nested rule table with its own fallback. The first matching rule wins.

use crate::{model::AssetType, rules::Rules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenList {
    Etf,
    Bond,
    ApprovedIndex,
    Fund,
    Accumulating,
}

impl TokenList {
    fn tokens(self, rules: &Rules) -> &[String] {
        match self {
            TokenList::Etf => &rules.etf_tokens,
            TokenList::Bond => &rules.bond_tokens,
            TokenList::ApprovedIndex => &rules.approved_index_keywords,
            TokenList::Fund => &rules.fund_tokens,
            TokenList::Accumulating => &rules.accumulating_tokens,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Uppercased name contains any token of the list.
    NameContainsAny(TokenList),
    /// ISIN starts with the domestic country code.
    DomesticIsin,
}

#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Type(AssetType),
    Refine(&'static RuleTable),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub when: Predicate,
    pub then: Outcome,
}

#[derive(Debug)]
pub struct RuleTable {
    pub rules: &'static [Rule],
    pub fallback: AssetType,
}

static ETF_RULES: RuleTable = RuleTable {
    rules: &[
        Rule {
            when: Predicate::NameContainsAny(TokenList::Bond),
            then: Outcome::Type(AssetType::EtfBondBased),
        },
        Rule {
            when: Predicate::NameContainsAny(TokenList::ApprovedIndex),
            then: Outcome::Type(AssetType::EtfOnApprovedList),
        },
    ],
    fallback: AssetType::EtfNotOnApprovedList,
};

static FUND_RULES: RuleTable = RuleTable {
    rules: &[Rule {
        when: Predicate::NameContainsAny(TokenList::Accumulating),
        then: Outcome::Type(AssetType::FundAccumulating),
    }],
    fallback: AssetType::FundDistributing,
};

/// Name-based ETF/fund rules come before the ISIN rule: a fund's ISIN
/// prefix says nothing about what it holds.
pub static ASSET_RULES: RuleTable = RuleTable {
    rules: &[
        Rule {
            when: Predicate::NameContainsAny(TokenList::Etf),
            then: Outcome::Refine(&ETF_RULES),
        },
        Rule {
            when: Predicate::NameContainsAny(TokenList::Fund),
            then: Outcome::Refine(&FUND_RULES),
        },
        Rule {
            when: Predicate::DomesticIsin,
            then: Outcome::Type(AssetType::EquityDomestic),
        },
    ],
    fallback: AssetType::EquityForeign,
};

struct Subject {
    name: String,
    isin: String,
}

impl Predicate {
    fn matches(self, subject: &Subject, rules: &Rules) -> bool {
        match self {
            Predicate::NameContainsAny(list) => list
                .tokens(rules)
                .iter()
                .any(|token| subject.name.contains(token.as_str())),
            Predicate::DomesticIsin => {
                !rules.domestic_country.is_empty()
                    && subject.isin.starts_with(rules.domestic_country.as_str())
            }
        }
    }
}

impl RuleTable {
    fn evaluate(&self, subject: &Subject, rules: &Rules) -> AssetType {
        for rule in self.rules {
            if rule.when.matches(subject, rules) {
                return match rule.then {
                    Outcome::Type(t) => t,
                    Outcome::Refine(table) => table.evaluate(subject, rules),
                };
            }
        }
        self.fallback
    }
}

pub fn classify(name: &str, isin: &str, rules: &Rules) -> AssetType {
    let subject = Subject {
        name: name.to_uppercase(),
        isin: isin.trim().to_uppercase(),
    };
    ASSET_RULES.evaluate(&subject, rules)
}

/// Country of registration, the first two characters of the ISIN.
pub fn country_of(isin: &str) -> String {
    isin.chars().take(2).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, isin: &str) -> AssetType {
        classify(name, isin, &Rules::default())
    }

    #[test]
    fn approved_index_etf() {
        assert_eq!(
            class("iShares Core MSCI World UCITS ETF", "IE00B4L5Y983"),
            AssetType::EtfOnApprovedList
        );
    }

    #[test]
    fn bond_etf() {
        assert_eq!(
            class("iShares Global Govt Bond UCITS ETF", "IE00B3F81K65"),
            AssetType::EtfBondBased
        );
    }

    #[test]
    fn bond_beats_approved_keyword() {
        assert_eq!(
            class("iShares Core Global Aggregate Bond UCITS ETF", "IE00BDBRDM35"),
            AssetType::EtfBondBased
        );
    }

    #[test]
    fn other_etf() {
        assert_eq!(
            class("WisdomTree Copper ETF", "GB00B15KXQ89"),
            AssetType::EtfNotOnApprovedList
        );
        assert_eq!(
            class("Xact Obligationer", "SE0003982286"),
            AssetType::EtfBondBased
        );
    }

    #[test]
    fn funds() {
        assert_eq!(
            class("Sparinvest INV. Globale Aktier Akk.", "DK0060012466"),
            AssetType::FundAccumulating
        );
        assert_eq!(
            class("Investeringsforeningen Danske Invest Danmark", "DK0010266238"),
            AssetType::FundDistributing
        );
    }

    #[test]
    fn equities_by_isin_prefix() {
        assert_eq!(class("Novo Nordisk", "DK0010274414"), AssetType::EquityDomestic);
        assert_eq!(class("Apple Inc", "US0378331005"), AssetType::EquityForeign);
        assert_eq!(class("Unknown Corp", "ZZ0000000001"), AssetType::EquityForeign);
        assert_eq!(country_of("DK0010274414"), "DK");
        assert_eq!(country_of("US0378331005"), "US");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            class("ishares core msci world ucits etf", "ie00b4l5y983"),
            AssetType::EtfOnApprovedList
        );
        assert_eq!(class("novo nordisk", "dk0010274414"), AssetType::EquityDomestic);
    }

    #[test]
    fn fund_name_beats_domestic_isin() {
        assert_eq!(
            class("Danske Invest Index Dow Jones Sustainability World KL UCITS ETF", "DK0060051282"),
            AssetType::EtfOnApprovedList
        );
    }

    #[test]
    fn custom_rules_change_the_outcome() {
        let rules = Rules {
            approved_index_keywords: vec!["FTSE".into()],
            domestic_country: "SE".into(),
            ..Rules::default()
        };
        assert_eq!(
            classify("Vanguard FTSE All-World UCITS ETF", "IE00B3RBWM25", &rules),
            AssetType::EtfOnApprovedList
        );
        assert_eq!(
            classify("iShares Core MSCI World UCITS ETF", "IE00B4L5Y983", &rules),
            AssetType::EtfNotOnApprovedList
        );
        assert_eq!(classify("Volvo B", "SE0000115446", &rules), AssetType::EquityDomestic);
        assert_eq!(classify("Novo Nordisk", "DK0010274414", &rules), AssetType::EquityForeign);
    }

    #[test]
    fn each_table_falls_back() {
        assert_eq!(ETF_RULES.fallback, AssetType::EtfNotOnApprovedList);
        assert_eq!(FUND_RULES.fallback, AssetType::FundDistributing);
        assert_eq!(ASSET_RULES.fallback, AssetType::EquityForeign);
        assert_eq!(ASSET_RULES.rules.len(), 3);
    }
}
