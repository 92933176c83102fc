//! Output artifacts: the JSON data file and a lookup table rendered from it.
//!
//! The JSON is the single source of truth. The lookup table is produced
//! by parsing that JSON back and feeding it through a [`TableSyntax`],
//! so supporting another target language only takes another syntax value.

use std::{fs, path::Path};

use anyhow::Context;
use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};

use crate::{model::AssetRecord, Result};

static GENERATED_AT_FMT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

const COMMENT_NAME_LEN: usize = 40;

/// Declared in the generated file itself so it always matches the emitted
/// values.
const TS_ASSET_TYPE_UNION: &str = "export type AssetType =\n  \
    | \"ETF_ON_APPROVED_LIST\"\n  \
    | \"ETF_NOT_ON_APPROVED_LIST\"\n  \
    | \"ETF_BOND_BASED\"\n  \
    | \"FUND_ACCUMULATING\"\n  \
    | \"FUND_DISTRIBUTING\"\n  \
    | \"EQUITY_DOMESTIC\"\n  \
    | \"EQUITY_FOREIGN\";";

/// How a lookup-table declaration is spelled in the target language.
#[derive(Debug, Clone, Copy)]
pub struct TableSyntax {
    pub line_comment: &'static str,
    pub prelude: &'static [&'static str],
    pub open: &'static str,
    pub close: &'static str,
    pub indent: &'static str,
    pub key_value_separator: &'static str,
    pub entry_terminator: &'static str,
}

impl TableSyntax {
    pub const TYPESCRIPT: TableSyntax = TableSyntax {
        line_comment: "//",
        prelude: &[TS_ASSET_TYPE_UNION],
        open: "export const ISIN_TO_AKTIVTYPE: Record<string, AssetType> = {",
        close: "};",
        indent: "  ",
        key_value_separator: ": ",
        entry_terminator: ",",
    };
}

pub fn to_json(records: &[AssetRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("failed to serialize assets as JSON")
}

fn string_literal(s: &str) -> Result<String> {
    Ok(serde_json::to_string(s)?)
}

// U+2028/U+2029 end a `//` comment in JavaScript even though they are not
// control characters.
fn comment_text(name: &str) -> String {
    name.chars()
        .take(COMMENT_NAME_LEN)
        .map(|c| match c {
            '\u{2028}' | '\u{2029}' => ' ',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}

pub fn render_lookup_table(
    json: &str,
    title: &str,
    generated_at: &str,
    syntax: &TableSyntax,
) -> Result<String> {
    let records: Vec<AssetRecord> =
        serde_json::from_str(json).context("failed to read back the assets JSON")?;
    let c = syntax.line_comment;

    let mut lines = vec![
        format!("{c} {}", comment_text(title)),
        format!("{c} Generated: {generated_at}"),
        String::new(),
    ];
    if !syntax.prelude.is_empty() {
        lines.extend(syntax.prelude.iter().map(|l| l.to_string()));
        lines.push(String::new());
    }
    lines.push(syntax.open.to_string());
    for r in &records {
        lines.push(format!(
            "{}{}{}{}{}  {c} {}",
            syntax.indent,
            string_literal(&r.isin)?,
            syntax.key_value_separator,
            string_literal(r.asset_type.as_str())?,
            syntax.entry_terminator,
            comment_text(&r.name),
        ));
    }
    lines.push(syntax.close.to_string());
    lines.push(String::new());
    lines.push(format!("{c} Total: {} securities", records.len()));

    let mut out = lines.join("\n");
    out.push('\n');
    Ok(out)
}

pub fn generated_at() -> Result<String> {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    Ok(now.format(GENERATED_AT_FMT)?)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Overwrites both artifacts. Nothing is written if serialization fails.
pub fn write_outputs<P: AsRef<Path>, Q: AsRef<Path>>(
    records: &[AssetRecord],
    json_path: P,
    table_path: Q,
    title: &str,
) -> Result<()> {
    let json = to_json(records)?;
    let table = render_lookup_table(&json, title, &generated_at()?, &TableSyntax::TYPESCRIPT)?;
    write_file(json_path.as_ref(), &json)?;
    write_file(table_path.as_ref(), &table)?;
    Ok(())
}
