//! Import command handler

use anyhow::{Context, Result};
use colored::*;

use super::{ImportCommands, OutputFormat};
use trial_import::config::ImportConfig;
use trial_import::import::{ImportReport, Trial, import_file};

/// Handle the import command
pub async fn handle_import_command(args: ImportCommands) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    if !args.file.exists() {
        anyhow::bail!("Workbook does not exist: {}", args.file.display());
    }

    let config = match &args.config {
        Some(path) => ImportConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ImportConfig::load_or_default().context("Failed to load user config")?,
    };

    let mut report = import_file(&args.file, &config)
        .await
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    for (sheet, date) in args.confirmations {
        report.trial = report
            .trial
            .with_confirmed_date(&sheet, date)
            .with_context(|| format!("Cannot confirm date for sheet '{}'", sheet))?;
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("Failed to serialize trial")?;
            println!("{}", json);
        }
        OutputFormat::Summary => print_summary(&report),
    }

    let pending = report.trial.pending_confirmations().len();
    if args.strict_dates && pending > 0 {
        anyhow::bail!(
            "{} sheet date(s) need confirmation; pass --confirm SHEET=YYYY-MM-DD",
            pending
        );
    }

    Ok(())
}

fn print_summary(report: &ImportReport) {
    let trial = &report.trial;

    println!("{}", trial.name.bold());
    print_metadata(trial);
    println!(
        "  {} blocks × {} treatments ({} plots)",
        trial.block_count,
        trial.treatment_count,
        trial.grid.plot_count()
    );
    println!();

    println!("{}", "Assessments".bold());
    for assessment in &trial.assessment_types {
        if assessment.unit.is_empty() {
            println!("  {}", assessment.name);
        } else {
            println!("  {} ({})", assessment.name, assessment.unit.dimmed());
        }
    }
    println!();

    println!("{}", "Dates".bold());
    for sheet_date in &trial.date_interpretations {
        let interpretation = &sheet_date.interpretation;
        let line = format!("  {:<20} → {}", sheet_date.sheet, interpretation.detected);
        if interpretation.needs_confirmation {
            let options: Vec<String> = interpretation
                .candidates
                .iter()
                .map(|c| format!("{} = {}", c.label, c.display))
                .collect();
            println!("{}  {}", line.yellow(), format!("[confirm: {}]", options.join(", ")).dimmed());
        } else {
            println!("{}", line.green());
        }
    }

    let warnings: Vec<_> = report.warnings().collect();
    if !warnings.is_empty() {
        println!();
        println!("{}", format!("Warnings ({})", warnings.len()).bold());
        for diagnostic in warnings {
            println!("  {}", diagnostic.to_string().yellow());
        }
    }
}

fn print_metadata(trial: &Trial) {
    for (label, value) in [
        ("Area", &trial.metadata.area),
        ("Assessor", &trial.metadata.assessor),
        ("Notes", &trial.metadata.notes),
    ] {
        if !value.is_empty() {
            println!("  {}: {}", label.dimmed(), value);
        }
    }
}
