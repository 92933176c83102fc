use std::{cmp::Ordering, collections::HashSet};

use crate::{model::Security, rules::Rules};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SelectionReport {
    pub domestic: usize,
    pub primary_foreign: usize,
    pub other_foreign: usize,
    pub fund_like: usize,
    pub total: usize,
}

fn top_by_market_cap<'a>(
    securities: &'a [Security],
    in_scope: impl Fn(&Security) -> bool,
    limit: usize,
) -> Vec<&'a Security> {
    let mut picked: Vec<&Security> = securities.iter().filter(|s| in_scope(s)).collect();
    // Stable, so equal caps keep input order.
    picked.sort_by(|a, b| {
        b.market_cap
            .partial_cmp(&a.market_cap)
            .unwrap_or(Ordering::Equal)
    });
    picked.truncate(limit);
    picked
}

/// Builds the reduced core list: all domestic securities, the largest
/// securities of the primary foreign country and of the other listed
/// countries, and every ETF/fund. Duplicates across the groups are kept
/// once, at their first position.
pub fn select_core(securities: &[Security], rules: &Rules) -> (Vec<Security>, SelectionReport) {
    let domestic: Vec<&Security> = securities
        .iter()
        .filter(|s| s.record.country == rules.domestic_country)
        .collect();
    let primary_foreign = top_by_market_cap(
        securities,
        |s| s.record.country == rules.primary_foreign_country,
        rules.max_primary_foreign,
    );
    let other_foreign = top_by_market_cap(
        securities,
        |s| rules.other_countries.contains(&s.record.country),
        rules.max_other_foreign,
    );
    let fund_like: Vec<&Security> = securities
        .iter()
        .filter(|s| s.record.asset_type.is_fund_like())
        .collect();

    let mut seen = HashSet::new();
    let selected: Vec<Security> = domestic
        .iter()
        .chain(&primary_foreign)
        .chain(&other_foreign)
        .chain(&fund_like)
        .copied()
        .filter(|s| seen.insert(s.record.isin.as_str()))
        .cloned()
        .collect();

    let report = SelectionReport {
        domestic: domestic.len(),
        primary_foreign: primary_foreign.len(),
        other_foreign: other_foreign.len(),
        fund_like: fund_like.len(),
        total: selected.len(),
    };
    (selected, report)
}
