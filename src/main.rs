// SPDX-License-Identifier: PMPL-1.0-or-later
//! spade-a11y CLI - accessibility compliance reports for Spade components

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use spade_a11y::audit::summary::{self, SummaryStats};
use spade_a11y::audit::{self, AuditAdapter, AuditTarget, CommandAuditor, RecordedAudits};
use spade_a11y::config::{self, Config};
use spade_a11y::feedback::FeedbackStore;
use spade_a11y::pipeline;
use spade_a11y::report::{generate_report, DirectorySink, OutputFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Accessibility compliance reporting for the Spade component library
#[derive(Parser)]
#[command(name = "spade-a11y")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (YAML or TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit every configured component and export the report artifacts
    Report {
        /// Directory of recorded axe-core results
        #[arg(long)]
        audits: Option<PathBuf>,

        /// Directory for the CSV, JSON and summary artifacts
        #[arg(long)]
        output: Option<PathBuf>,

        /// What to print once the artifacts are written
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Fail unless the average score is above this
        #[arg(long, default_value_t = 80.0)]
        min_average: f64,
    },

    /// Quick audit of a single component
    Audit {
        /// Component name, e.g. Button
        component: String,

        /// Directory of recorded axe-core results
        #[arg(long)]
        audits: Option<PathBuf>,
    },

    /// Summary statistics across the configured components
    Stats {
        /// Directory of recorded axe-core results
        #[arg(long)]
        audits: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Destination (defaults to the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Inspect stored usability-study feedback
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },
}

#[derive(Subcommand)]
enum FeedbackAction {
    /// Print the stored response and whether it is ready to submit
    Show {
        /// Feedback store directory
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the stored response in export form
    Export {
        /// Feedback store directory
        #[arg(long)]
        store: Option<PathBuf>,

        /// Also write the export to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Executive summary
    Text,
    /// Full report JSON
    Json,
    /// Per-component CSV
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("spade_a11y=debug")
    } else {
        EnvFilter::new("spade_a11y=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Recorded results win over a configured command
fn select_adapter(audits: Option<PathBuf>, config: &Config) -> anyhow::Result<Box<dyn AuditAdapter>> {
    if let Some(dir) = audits.or_else(|| config.audit.results_dir.clone()) {
        return Ok(Box::new(RecordedAudits::new(dir)));
    }
    if let Some(command) = &config.audit.command {
        return Ok(Box::new(CommandAuditor::from_command_line(command)?));
    }
    anyhow::bail!("no audit source: pass --audits or set audit.results_dir or audit.command in the config")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    match cli.command {
        Commands::Report { audits, output, format, min_average } => {
            let config = load(&config_path)?;
            let adapter = select_adapter(audits, &config)?;
            let sink = DirectorySink::new(output.unwrap_or_else(|| config.output.directory.clone()));

            let (report, delivered) = pipeline::generate_and_export(adapter.as_ref(), &config, &sink).await?;
            for name in &delivered {
                eprintln!("Wrote {}", sink.dir().join(name).display());
            }
            println!("{}", generate_report(&report, format.into())?);

            let average = report.overall_compliance.average_wcag_score;
            let zero_scores = report.component_results.iter().filter(|c| c.wcag_score == 0).count();
            if average <= min_average || zero_scores > 0 {
                eprintln!(
                    "Compliance gate failed: average {:.2} (need > {}), {} component(s) scored 0",
                    average, min_average, zero_scores
                );
                std::process::exit(1);
            }
        }

        Commands::Audit { component, audits } => {
            let config = load(&config_path)?;
            let adapter = select_adapter(audits, &config)?;
            let result = audit::audit_component(adapter.as_ref(), &AuditTarget::new(&component)).await?;

            summary::log_audit_result(&result, cli.verbose);
            println!("{}", summary::quick_check(&result, config.thresholds.compliant));
        }

        Commands::Stats { audits } => {
            let config = load(&config_path)?;
            let adapter = select_adapter(audits, &config)?;
            let batch = pipeline::run_audits(adapter.as_ref(), &config).await;
            for (component, reason) in &batch.skipped {
                eprintln!("Skipped {}: {}", component, reason);
            }
            let stats = SummaryStats::from_results(&batch.results)?;
            println!("{}", stats.render());
        }

        Commands::Init { path } => {
            let path = path.unwrap_or(config_path);
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            config::write_default_config(&path)?;
            println!("Wrote default config to {}", path.display());
        }

        Commands::Feedback { action } => {
            let config = load(&config_path)?;
            match action {
                FeedbackAction::Show { store } => {
                    let store = FeedbackStore::new(store.unwrap_or_else(|| config.feedback.store_dir.clone()));
                    let feedback = store.load_feedback();
                    println!("{}", serde_json::to_string_pretty(&feedback)?);
                    println!("Completed tasks: {}", feedback.completed_task_count());
                    println!("Total time spent: {}", feedback.total_time_spent());
                    println!("Ready to submit: {}", feedback.is_valid_for_submission());
                }
                FeedbackAction::Export { store, output } => {
                    let store = FeedbackStore::new(store.unwrap_or_else(|| config.feedback.store_dir.clone()));
                    let exported = store.load_feedback().export_at(Utc::now())?;
                    let json = serde_json::to_string_pretty(&exported)?;
                    write_output(&json, output.as_deref())?;
                }
            }
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Config> {
    config::load_config(path).with_context(|| format!("loading config from {}", path.display()))
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Feedback written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
