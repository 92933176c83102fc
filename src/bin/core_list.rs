use isin_asset_mapper::{
    classify_rows, emit::write_outputs, into_records,
    loader::load_csv_files,
    normalize::normalize,
    print_banner, print_distribution, print_outputs,
    rules::{Rules, RULES_FILE},
    select::select_core,
    Result, INPUT_FILES, OUTPUT_JSON, OUTPUT_LOOKUP_TABLE,
};

fn main() -> Result<()> {
    print_banner("CORE LIST");

    let rules = Rules::load_or_default(RULES_FILE)?;
    let tables = load_csv_files(&INPUT_FILES)?;

    let total: usize = tables.iter().map(|t| t.rows.len()).sum();
    println!("\nTotal: {total} rows loaded");

    let securities = classify_rows(normalize(&tables), &rules);
    println!("After cleaning: {} securities", securities.len());

    let (selected, report) = select_core(&securities, &rules);
    println!("  {}: {}", rules.domestic_country, report.domestic);
    println!(
        "  {} (top {}): {}",
        rules.primary_foreign_country, rules.max_primary_foreign, report.primary_foreign
    );
    println!(
        "  Other countries (top {}): {}",
        rules.max_other_foreign, report.other_foreign
    );
    println!("  ETFs and funds: {}", report.fund_like);
    println!("\n→ Combined: {} securities", report.total);

    let records = into_records(selected);
    println!("\nDistribution:");
    print_distribution(&records);

    write_outputs(
        &records,
        OUTPUT_JSON,
        OUTPUT_LOOKUP_TABLE,
        "Auto-generated core list",
    )?;
    print_outputs(records.len());

    Ok(())
}
