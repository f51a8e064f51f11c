//! Command implementations for the CPT processor CLI
//!
//! This module contains the command execution logic, progress reporting and
//! report rendering for the CLI interface.

use crate::app::format::CptFormat;
use crate::app::models::{CanonicalField, CanonicalRecord, Outcome, Rejection};
use crate::app::services::record_processor::{BatchStats, ProcessingResult, ProcessingStats};
use crate::cli::args::{BatchArgs, Commands, LogArgs, OutputFormat, ReadArgs};
use crate::constants::LOG_TARGET;
use crate::{Error, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Main command runner
pub fn run(command: Commands) -> Result<BatchStats> {
    match command {
        Commands::Read(args) => {
            init_logging(&args.logging)?;
            run_read(&args)
        }
        Commands::Batch(args) => {
            init_logging(&args.logging)?;
            run_batch(&args)
        }
    }
}

/// Set up structured logging based on CLI arguments
pub fn init_logging(args: &LogArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Read one file and print its record or rejection
fn run_read(args: &ReadArgs) -> Result<BatchStats> {
    args.validate()?;
    let config = args.quality.to_config()?;
    let format = args.resolve_format()?;
    info!("Reading {} as {}", args.file.display(), format);

    let result = format.process_file(&args.file, &config)?;

    match args.output {
        OutputFormat::Human => print_human_record(&args.file, &result),
        OutputFormat::Json => {
            let fields = args.fields.as_ref().map(|list| list.fields.as_slice());
            println!("{}", render_json(&result.outcome, fields)?);
        }
    }

    let mut stats = BatchStats::new();
    tally(&mut stats, &result.outcome);
    Ok(stats)
}

/// Read every CPT file in a directory
fn run_batch(args: &BatchArgs) -> Result<BatchStats> {
    args.validate()?;
    let config = args.quality.to_config()?;
    let start_time = Instant::now();

    let files = discover_files(&args.dir, args.recursive)?;
    info!("Found {} CPT files in {}", files.len(), args.dir.display());

    let progress_bar = args.logging.show_progress().then(|| {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    });

    let mut stats = BatchStats::new();
    for (path, format) in &files {
        if let Some(pb) = &progress_bar {
            pb.set_message(file_label(path));
        }

        match format.process_file(path, &config) {
            Ok(result) => tally(&mut stats, &result.outcome),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                stats.record_failure(format!("{}: {}", path.display(), e));
            }
        }

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("All CPT files read");
    }

    match args.output {
        OutputFormat::Human => print_batch_summary(&stats, start_time.elapsed().as_millis()),
        OutputFormat::Json => println!("{:#}", batch_json(&stats)),
    }
    Ok(stats)
}

/// CPT files in `dir` with a recognised extension, in path order
pub fn discover_files(dir: &Path, recursive: bool) -> Result<Vec<(PathBuf, CptFormat)>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).max_depth(max_depth).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            Error::directory_traversal(format!("Failed to read {}", dir.display()), e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        match CptFormat::from_path(entry.path()) {
            Ok(format) => files.push((entry.into_path(), format)),
            Err(_) => debug!("Skipping {}", entry.path().display()),
        }
    }

    Ok(files)
}

fn tally(stats: &mut BatchStats, outcome: &Outcome<CanonicalRecord>) {
    match outcome {
        Outcome::Accepted(record) => stats.record_accepted(record.len()),
        Outcome::Rejected(rejection) => stats.record_rejected(rejection),
    }
}

/// JSON for a record (optionally restricted to `fields`) or a rejection
pub fn render_json(
    outcome: &Outcome<CanonicalRecord>,
    fields: Option<&[CanonicalField]>,
) -> Result<String> {
    let value = match (outcome, fields) {
        (Outcome::Accepted(record), Some(fields)) => record.to_json_subset(fields)?,
        (Outcome::Accepted(record), None) => serde_json::to_value(record).map_err(json_error)?,
        (Outcome::Rejected(rejection), _) => {
            serde_json::json!({ "rejected": serde_json::to_value(rejection).map_err(json_error)? })
        }
    };
    serde_json::to_string_pretty(&value).map_err(json_error)
}

fn json_error(e: serde_json::Error) -> Error {
    Error::data_validation(format!("Cannot serialize output: {}", e))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_human_record(path: &Path, result: &ProcessingResult) {
    println!("\n{} {}", "CPT file:".bright_cyan(), path.display());

    match &result.outcome {
        Outcome::Accepted(record) => {
            println!("  {} {}", "Status:".bright_cyan(), "accepted".bright_green().bold());
            println!("  {} {}", "Name:".bright_cyan(), record.name);
            println!(
                "  {} ({:.2}, {:.2})",
                "Location:".bright_cyan(),
                record.coordinates[0],
                record.coordinates[1]
            );
            println!(
                "  {} {:.2} m",
                "Reference level:".bright_cyan(),
                record.local_reference_level
            );
            println!(
                "  {} {}",
                "Samples:".bright_cyan(),
                record.len().to_string().bright_white().bold()
            );
            println!(
                "  {} {:.2} m",
                "Max depth:".bright_cyan(),
                record.max_depth().unwrap_or(0.0)
            );
            println!(
                "  {} {}",
                "Water:".bright_cyan(),
                record.water_measurement_type
            );
            print_processing_stats(&result.stats);
        }
        Outcome::Rejected(rejection) => print_rejection(rejection),
    }
    println!();
}

fn print_rejection(rejection: &Rejection) {
    println!("  {} {}", "Status:".bright_cyan(), "rejected".bright_yellow().bold());
    println!("  {} {}", "Reason:".bright_cyan(), rejection.reason);
    println!("  {} {}", "Message:".bright_cyan(), rejection.message);
}

fn print_processing_stats(stats: &ProcessingStats) {
    if let Some(source) = stats.depth_source {
        println!("  {} {}", "Depth from:".bright_cyan(), source);
    }
    println!(
        "  {} {} in, {} incomplete, {} duplicate, {} synthetic, {} clamped",
        "Rows:".bright_cyan(),
        stats.input_rows,
        stats.incomplete_rows_removed,
        stats.duplicate_rows_removed,
        stats.synthetic_rows_added,
        stats.values_clamped
    );
}

fn print_batch_summary(stats: &BatchStats, elapsed_ms: u128) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        elapsed_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files:".bright_cyan(),
        stats.total_files.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Accepted:".bright_cyan(),
        stats.accepted.to_string().bright_green()
    );
    println!(
        "  {} {}",
        "Rejected:".bright_cyan(),
        stats.rejected.to_string().bright_yellow()
    );
    for (reason, count) in &stats.rejection_reasons {
        println!("    {} {}", format!("{}:", reason).dimmed(), count);
    }
    println!(
        "  {} {}",
        "Failed:".bright_cyan(),
        stats.failed.to_string().bright_red()
    );
    println!(
        "  {} {}",
        "Samples:".bright_cyan(),
        stats.total_samples.to_string().bright_white()
    );
    println!("  {}", stats.summary());

    if !stats.error_messages.is_empty() {
        println!("\n{}", "Errors".bright_red().bold());
        for message in &stats.error_messages {
            println!("  {}", message);
        }
    }
}

fn batch_json(stats: &BatchStats) -> serde_json::Value {
    serde_json::json!({
        "total_files": stats.total_files,
        "accepted": stats.accepted,
        "rejected": stats.rejected,
        "failed": stats.failed,
        "rejection_reasons": stats.rejection_reasons,
        "total_samples": stats.total_samples,
        "success_rate": stats.success_rate(),
        "errors": stats.error_messages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::RejectionReason;
    use std::fs;
    use tempfile::TempDir;

    fn create_record() -> CanonicalRecord {
        CanonicalRecord::builder("CPT-1")
            .local_reference_level(1.0)
            .penetration_length(vec![0.5, 1.0])
            .depth(vec![0.5, 1.0])
            .tip(vec![1000.0, 1200.0])
            .friction(vec![10.0, 12.0])
            .friction_ratio(vec![1.0, 1.0])
            .pore_pressure(vec![0.0, 0.0])
            .build()
            .unwrap()
    }

    #[test]
    fn test_discover_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.gef"), "").unwrap();
        fs::write(dir.path().join("a.xml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.GEF"), "").unwrap();

        let flat = discover_files(dir.path(), false).unwrap();
        let names: Vec<String> = flat.iter().map(|(p, _)| file_label(p)).collect();
        assert_eq!(names, vec!["a.xml", "b.gef"]);
        assert_eq!(flat[0].1, CptFormat::BroXml);

        let deep = discover_files(dir.path(), true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_render_json_subset() {
        let outcome = Outcome::Accepted(create_record());
        let json = render_json(&outcome, Some(&[CanonicalField::Name, CanonicalField::Depth]))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "CPT-1");
        assert_eq!(value["depth"], serde_json::json!([0.5, 1.0]));
        assert!(value.get("tip").is_none());
    }

    #[test]
    fn test_render_json_rejection() {
        let outcome: Outcome<CanonicalRecord> =
            Outcome::Rejected(Rejection::new("CPT-2", RejectionReason::Empty));
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&outcome, None).unwrap()).unwrap();

        assert_eq!(value["rejected"]["record_id"], "CPT-2");
        assert_eq!(value["rejected"]["reason"], "empty");
        assert_eq!(value["rejected"]["message"], "File CPT-2 contains no data");
    }

    #[test]
    fn test_tally() {
        let mut stats = BatchStats::new();
        tally(&mut stats, &Outcome::Accepted(create_record()));
        tally(
            &mut stats,
            &Outcome::Rejected(Rejection::new("CPT-2", RejectionReason::Empty)),
        );
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.total_samples, 2);
    }

    #[test]
    fn test_batch_json() {
        let mut stats = BatchStats::new();
        stats.record_failure("bad.gef: broken".to_string());
        let value = batch_json(&stats);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["errors"][0], "bad.gef: broken");
    }
}
