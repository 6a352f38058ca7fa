//! Session commands: create, collect, navigate, inspect

use super::{invalid, open_session, parse_category};
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{self, print_info, print_success, print_warning, OutputFormat};
use bowtie_engine::{GuidedWorkflow, JsonFileStore, StepValidation};
use bowtie_types::*;
use clap::Subcommand;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Session subcommands
#[derive(Subcommand)]
pub enum SessionCommands {
    /// Start a new session and write its snapshot
    New {
        /// Snapshot file to create
        path: String,

        /// Project name
        #[arg(short, long)]
        project: String,

        /// Central problem statement
        #[arg(long)]
        problem: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Add an item to a category
    Add {
        /// Snapshot file
        path: String,

        /// Category (activities, pressures, preventive-controls, consequences, protective-controls)
        #[arg(value_parser = parse_category)]
        category: Category,

        /// Custom item name
        #[arg(required_unless_present = "term", conflicts_with = "term")]
        name: Option<String>,

        /// Vocabulary term id instead of a custom name
        #[arg(short, long)]
        term: Option<String>,
    },

    /// Advance to the next step
    Next {
        /// Snapshot file
        path: String,
    },

    /// Jump to a step by number
    Goto {
        /// Snapshot file
        path: String,

        /// Step number (1-8)
        #[arg(allow_negative_numbers = true)]
        step: i64,
    },

    /// Show session progress
    Inspect {
        /// Snapshot file
        path: String,
    },

    /// Validate every step
    Validate {
        /// Snapshot file
        path: String,
    },
}

/// Session overview
#[derive(Debug, Serialize)]
struct SessionSummary {
    project_name: String,
    central_problem: String,
    current_step: u8,
    step_title: &'static str,
    progress: f64,
    completed_steps: Vec<u8>,
    items: Vec<CategoryCount>,
    saved_at: String,
}

#[derive(Debug, Serialize, Tabled)]
struct CategoryCount {
    category: String,
    items: usize,
}

/// Table row for validation results
#[derive(Debug, Tabled)]
struct ValidationRow {
    step: u8,
    title: &'static str,
    valid: String,
    message: String,
}

impl From<&StepValidation> for ValidationRow {
    fn from(v: &StepValidation) -> Self {
        use colored::Colorize;
        Self {
            step: v.step.number(),
            title: v.step.title(),
            valid: if v.valid {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            },
            message: v.message.clone(),
        }
    }
}

/// Execute a session command
pub fn execute(command: SessionCommands, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    match command {
        SessionCommands::New {
            path,
            project,
            problem,
            force,
        } => {
            if Path::new(&path).exists() && !force {
                return Err(invalid(format!(
                    "{} already exists (use --force to overwrite)",
                    path
                )));
            }

            let mut workflow =
                GuidedWorkflow::with_config(config.load_vocabulary()?, config.workflow.clone());
            let now = chrono::Utc::now();
            workflow.update_field(FieldKey::ProjectName, project, now);
            if let Some(problem) = problem {
                workflow.update_field(FieldKey::CentralProblem, problem, now);
            }
            workflow.save_to(&JsonFileStore::new(&path))?;

            print_success(&format!("Created session {}", path));
            Ok(())
        }

        SessionCommands::Add {
            path,
            category,
            name,
            term,
        } => {
            let (mut workflow, store, _) = open_session(&path, config)?;
            let item = match (term, name) {
                (Some(term_id), _) => workflow.add_from_vocabulary(category, &term_id)?,
                (None, Some(name)) => workflow.add_custom_item(category, &name)?,
                (None, None) => return Err(invalid("either a name or --term is required")),
            };
            workflow.save_to(&store)?;

            print_success(&format!(
                "Added '{}' to {} ({})",
                item.name,
                category,
                item.id.as_deref().unwrap_or("-")
            ));
            Ok(())
        }

        SessionCommands::Next { path } => {
            let (mut workflow, store, _) = open_session(&path, config)?;
            let advance = workflow.next_step();
            workflow.save_to(&store)?;

            if let Some(warning) = &advance.warning {
                print_warning(&warning.message);
            }
            if advance.moved {
                print_success(&format!("Now on step {}", advance.step));
            } else {
                print_info(&format!("Already on the last step ({})", advance.step));
            }
            Ok(())
        }

        SessionCommands::Goto { path, step } => {
            let (mut workflow, store, _) = open_session(&path, config)?;
            let step = workflow.go_to_step(step)?;
            workflow.save_to(&store)?;
            print_success(&format!("Now on step {}", step));
            Ok(())
        }

        SessionCommands::Inspect { path } => {
            let (workflow, _, report) = open_session(&path, config)?;
            let state = workflow.state();
            let summary = SessionSummary {
                project_name: state.project_name.clone(),
                central_problem: state.central_problem.clone(),
                current_step: state.current_step.number(),
                step_title: state.current_step.title(),
                progress: workflow.progress_percentage(),
                completed_steps: state.completed_steps.iter().map(|s| s.number()).collect(),
                items: workflow
                    .items()
                    .counts()
                    .into_iter()
                    .map(|(category, items)| CategoryCount {
                        category: category.to_string(),
                        items,
                    })
                    .collect(),
                saved_at: report.saved_at_display(),
            };

            match format {
                OutputFormat::Table => print_summary(&summary),
                _ => output::print_single(&summary, format),
            }
        }

        SessionCommands::Validate { path } => {
            let (workflow, _, _) = open_session(&path, config)?;
            let results = workflow.validate_all();
            output::print_rows(&results, format, |v| ValidationRow::from(v))
        }
    }
}

fn print_summary(summary: &SessionSummary) -> CliResult<()> {
    use colored::Colorize;

    println!("{}", "Session".bold());
    println!("  Project:  {}", summary.project_name);
    println!("  Problem:  {}", summary.central_problem);
    println!(
        "  Step:     {}. {}",
        summary.current_step, summary.step_title
    );
    println!("  Progress: {:.1}%", summary.progress);
    println!("  Saved:    {}", summary.saved_at);
    println!();
    output::print_rows(&summary.items, OutputFormat::Table, |c| CategoryCount {
        category: c.category.clone(),
        items: c.items,
    })
}
