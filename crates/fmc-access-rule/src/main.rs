//! access-rule-plan entry point
//!
//! Validates a declarative access rule document, prints the FMC request
//! body it encodes to and, given a saved state, the planned change.
//! Makes no remote calls.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fmc_access_rule::document::{load_rule_document, load_state_document};
use fmc_access_rule::fields::DIAG_SUMMARY;
use fmc_access_rule::{encode, plan_change, validate};
use fmc_orch_common::{Diagnostics, PlannedChange};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "access-rule-plan", version, about)]
struct Args {
    /// Declarative rule document (JSON, or YAML by extension)
    rule: PathBuf,

    /// Saved state of the same rule to plan against
    #[arg(long)]
    prior: Option<PathBuf>,

    /// Output format for the encoded request body
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Result of one invocation, rendered by `main`.
#[derive(Debug)]
enum Outcome {
    /// The rule document failed validation.
    Invalid(Diagnostics),
    /// The encoded body and, given a prior state, the plan line.
    Planned { body: String, plan: Option<String> },
}

impl Outcome {
    fn exit_code(&self) -> ExitCode {
        match self {
            Self::Invalid(_) => ExitCode::FAILURE,
            Self::Planned { .. } => ExitCode::SUCCESS,
        }
    }
}

fn run(args: &Args) -> Result<Outcome> {
    let raw = load_rule_document(&args.rule)
        .with_context(|| format!("loading rule document {}", args.rule.display()))?;

    let record = match validate(&raw) {
        Ok(record) => record,
        Err(errs) => return Ok(Outcome::Invalid(errs.to_diagnostics(DIAG_SUMMARY))),
    };
    info!(acp = %record.acp, "Validated access rule {}", record.name);

    let encoded = encode(&record);
    let body = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&encoded)?,
        OutputFormat::Yaml => serde_yaml::to_string(&encoded)?,
    };

    let plan = match &args.prior {
        Some(prior_path) => {
            let prior = load_state_document(prior_path)
                .with_context(|| format!("loading prior state {}", prior_path.display()))?;
            let change = plan_change(&prior.record, &record)?;
            if change.requires_replace() {
                info!("Rule must be destroyed and recreated");
            } else if change != PlannedChange::NoOp {
                info!("In-place update is not supported; the host must replace the rule");
            }
            Some(match prior.id.as_deref() {
                Some(id) => format!("plan for {}: {}", id, change),
                None => format!("plan: {}", change),
            })
        }
        None => None,
    };

    Ok(Outcome::Planned { body, plan })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(outcome) => {
            match &outcome {
                Outcome::Invalid(diags) => {
                    for diag in diags {
                        error!("{}", diag);
                    }
                }
                Outcome::Planned { body, plan } => {
                    println!("{}", body);
                    if let Some(plan) = plan {
                        println!("{}", plan);
                    }
                }
            }
            outcome.exit_code()
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
