//! Human-readable reporting

use colored::*;
use measure_kit_core::{
    CQL_CONTENT_TYPE, ELM_JSON_CONTENT_TYPE, MeasureBundle, TerminologyIndex, WriteStats,
    artifact_base_name,
};
use std::path::Path;
use std::time::Duration;

/// Print the result of `generate`
pub fn print_generate_summary(output_dir: &Path, stats: &WriteStats, elapsed: Duration) {
    println!("\n{} {}", "✓".green(), "Execution project generated".green().bold());
    println!("  Output directory: {}", output_dir.display().to_string().cyan());
    println!("  Libraries: {}", stats.libraries);
    println!("  Value sets: {} ({} codes)", stats.value_sets, stats.codes);
    match &stats.entry_point {
        Some(entry) => println!("  Entry point: {}", entry.cyan()),
        None => println!(
            "  Entry point: {}",
            "main library not found, index.js not generated".yellow()
        ),
    }
    println!("  Files written: {}", stats.files_written);
    println!("  Time: {:.2}s", elapsed.as_secs_f64());

    println!("\n{}", "Next steps:".bold());
    println!("  cd {}", output_dir.display());
    println!("  npm install");
    println!("  {}", "npm start".bright_blue());
}

/// Print the result of `inspect`
pub fn print_bundle_summary(bundle: &MeasureBundle, index: &TerminologyIndex) {
    let measure = bundle.measure();
    let measure_name = measure
        .name
        .as_deref()
        .or(measure.url.as_deref())
        .or(measure.id.as_deref())
        .unwrap_or("<unnamed>");

    println!("{} {}", "Measure:".bold(), measure_name);
    println!("  Main library: {}", bundle.main_library_url().cyan());

    println!("\n{} ({})", "Libraries:".bold(), bundle.libraries().len());
    for (index, library) in bundle.libraries().iter().enumerate() {
        let marker = if bundle.is_entry_point(library) {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        let elm = presence(library.find_content(ELM_JSON_CONTENT_TYPE).is_some());
        let cql = presence(library.find_content(CQL_CONTENT_TYPE).is_some());
        println!(
            "  {} {}  ELM {}  CQL {}",
            marker,
            artifact_base_name(library, index),
            elm,
            cql
        );
    }

    println!(
        "\n{} ({}, {} codes)",
        "Value sets:".bold(),
        index.len(),
        index.code_count()
    );
    for (url, versions) in index.iter() {
        for (version, codes) in versions {
            let version = if version.is_empty() { "-" } else { version.as_str() };
            println!("  {}  {}  {} codes", url, version.dimmed(), codes.len());
        }
    }

    let skipped = bundle.value_sets().iter().filter(|vs| vs.url.is_none()).count();
    if skipped > 0 {
        println!(
            "  {}",
            format!("{skipped} value set(s) without url skipped").yellow()
        );
    }
}

fn presence(present: bool) -> ColoredString {
    if present { "yes".green() } else { "no".red() }
}
