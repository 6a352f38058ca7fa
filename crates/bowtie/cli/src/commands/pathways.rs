//! Pathway commands: conversion and the completion gate

use super::open_session;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, print_success, print_warning, OutputFormat};
use bowtie_engine::ConversionEngine;
use bowtie_types::*;
use clap::Subcommand;
use tabled::Tabled;

/// Pathway subcommands
#[derive(Subcommand)]
pub enum PathwayCommands {
    /// Convert collected items into pathway rows
    Convert {
        /// Snapshot file
        path: String,

        /// Random seed for scenario selection and scoring
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum number of scenarios
        #[arg(long)]
        cap: Option<usize>,
    },

    /// Mark the workflow complete and print its pathways
    Complete {
        /// Snapshot file
        path: String,

        /// Write the completed session back to the snapshot file
        #[arg(short, long)]
        save: bool,
    },
}

/// Table row for pathway display
#[derive(Debug, Tabled)]
struct PathwayTableRow {
    activity: String,
    pressure: String,
    preventive: String,
    escalation: String,
    protective: String,
    consequence: String,
    #[tabled(rename = "L")]
    likelihood: u8,
    #[tabled(rename = "S")]
    severity: u8,
    risk: String,
}

impl From<&PathwayRow> for PathwayTableRow {
    fn from(row: &PathwayRow) -> Self {
        use colored::Colorize;
        let risk = match row.risk_level {
            RiskLevel::Low => row.risk_level.as_str().green(),
            RiskLevel::Medium => row.risk_level.as_str().yellow(),
            RiskLevel::High => row.risk_level.as_str().red(),
        };
        Self {
            activity: row.activity.clone(),
            pressure: row.pressure.clone(),
            preventive: row.preventive_control.clone(),
            escalation: row.escalation_factor.clone(),
            protective: row.protective_mitigation.clone(),
            consequence: row.consequence.clone(),
            likelihood: row.likelihood,
            severity: row.severity,
            risk: risk.to_string(),
        }
    }
}

/// Execute a pathway command
pub fn execute(command: PathwayCommands, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    match command {
        PathwayCommands::Convert { path, seed, cap } => {
            let (workflow, _, _) = open_session(&path, config)?;

            let mut engine = ConversionEngine::new(config.workflow.conversion.clone());
            if let Some(seed) = seed {
                engine = engine.with_seed(seed);
            }
            if let Some(cap) = cap {
                engine = engine.with_cap(cap);
            }
            let outcome = engine.convert_detailed(&workflow.state().central_problem, workflow.items())?;
            let rows = outcome.rows();

            if format == OutputFormat::Table {
                if !outcome.backfilled.is_empty() {
                    let names: Vec<_> = outcome.backfilled.iter().map(|c| c.to_string()).collect();
                    print_warning(&format!("Placeholders used for: {}", names.join(", ")));
                }
                if outcome.was_capped() {
                    print_warning(&format!(
                        "Kept {} of {} scenarios",
                        rows.len(),
                        outcome.base_scenarios
                    ));
                }
            }
            output::print_rows(&rows, format, |r| PathwayTableRow::from(r))
        }

        PathwayCommands::Complete { path, save } => {
            let (mut workflow, store, _) = open_session(&path, config)?;
            let rows = workflow.mark_complete()?;
            if save {
                workflow.save_to(&store)?;
            }

            if format == OutputFormat::Table {
                print_success(&format!("Workflow complete with {} pathways", rows.len()));
            }
            output::print_rows(&rows, format, |r| PathwayTableRow::from(r))
        }
    }
}
