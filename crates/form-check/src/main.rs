mod cli;
mod config;
mod selection;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};

use form_guard::{validate_batch, BatchResult, InputMap};

use crate::cli::Cli;

// ---------------------------------------------------------------------------
// Submission I/O
// ---------------------------------------------------------------------------

/// Read the raw submission from `path`, or from stdin when `path` is `None`.
fn read_submission(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission file: {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read submission from stdin")?;
            Ok(buf)
        }
    }
}

/// Parse a submission. Only a JSON object of field values is accepted.
fn parse_submission(raw: &str) -> Result<InputMap> {
    let value: Value = serde_json::from_str(raw).context("submission is not valid JSON")?;
    let Value::Object(fields) = value else {
        bail!("submission must be a JSON object of field values");
    };
    Ok(fields.into_iter().collect())
}

fn render(report: &BatchResult, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    rendered.context("failed to serialize validation report")
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    // 1. Parse CLI args.
    let cli = Cli::parse();

    // 2. Load config, then merge CLI overrides.
    let mut cfg = config::load(&cli.config)?;

    if let Some(ref rules) = cli.rules {
        cfg.rules_file = rules.clone();
    }
    if cli.pretty {
        cfg.output.pretty = true;
    }

    // 3. Init tracing-subscriber with JSON format. stdout carries the report.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        config_file = %cli.config.display(),
        rules_file = %cfg.rules_file.display(),
        "form-check starting"
    );

    // 4. Load the rule file: text fields, then checkbox and radio selections.
    let rules_text = std::fs::read_to_string(&cfg.rules_file)
        .with_context(|| format!("failed to read rule file: {}", cfg.rules_file.display()))?;
    let rule_set =
        form_guard::load_rules_from_str(&rules_text).context("failed to load rule file")?;
    let selections = selection::parse_selections(&rules_text)?;
    selection::check_names(&selections, &rule_set.fields)?;
    info!(
        fields = rule_set.fields.len(),
        selections = selections.len(),
        "rules loaded"
    );

    // 5. Read and validate the submission.
    let raw = read_submission(cli.input_path().map(|p| p.as_path()))?;
    let inputs = parse_submission(&raw)?;
    let report = selection::merge_selections(
        validate_batch(&inputs, &rule_set.fields),
        &inputs,
        &selections,
    );

    println!("{}", render(&report, cfg.output.pretty)?);

    // 6. Exit status mirrors the verdict.
    if report.is_valid {
        info!("submission accepted");
        Ok(ExitCode::SUCCESS)
    } else {
        let invalid: Vec<&str> = report.invalid_fields().collect();
        warn!(?invalid, "submission rejected");
        Ok(ExitCode::FAILURE)
    }
}
