use isin_asset_mapper::{
    classify_rows, emit::write_outputs, into_records,
    loader::load_csv_files,
    normalize::{detected_columns, normalize},
    print_banner, print_distribution, print_outputs,
    rules::{Rules, RULES_FILE},
    Result, INPUT_FILES, OUTPUT_JSON, OUTPUT_LOOKUP_TABLE,
};

const PREVIEW_LEN: usize = 10;

fn main() -> Result<()> {
    print_banner("NORDNET CSV CONVERTER");

    let rules = Rules::load_or_default(RULES_FILE)?;
    let tables = load_csv_files(&INPUT_FILES)?;

    let total: usize = tables.iter().map(|t| t.rows.len()).sum();
    println!("\nTotal: {total} rows loaded");
    println!("Columns: {:?}", detected_columns(&tables));

    let records = into_records(classify_rows(normalize(&tables), &rules));
    println!("\nAfter cleaning: {} unique securities", records.len());
    println!("\nAsset type distribution:");
    print_distribution(&records);

    write_outputs(
        &records,
        OUTPUT_JSON,
        OUTPUT_LOOKUP_TABLE,
        "Auto-generated from Nordnet CSV files",
    )?;
    print_outputs(records.len());

    println!("\nExample (first {PREVIEW_LEN}):");
    let preview = &records[..records.len().min(PREVIEW_LEN)];
    println!("{}", serde_json::to_string_pretty(preview)?);

    Ok(())
}
