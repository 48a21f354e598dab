// abap-assistant-core/src/lib.rs

// declare modules
pub mod analysis;
pub mod config;
pub mod diff;
pub mod error;
pub mod source;
pub mod utils;

// re-export key structs/functions for external use by other crates
pub use anyhow::{Context, Result}; // re-export for convenience
pub use clap::Parser; // re-export Parser for CLI crate
pub use console::style; // re-export for the CLI's error output
pub use dotenv::dotenv;

pub use crate::analysis::{
    analyse_document, classify_document, suggest_for_line, AnalysisSession, Finding,
    LearningReport, PatternMiner, ProjectPatternProfile, Severity, StyleCategory,
};
pub use crate::config::Config;
pub use crate::diff::{diff_lines, diff_text, format_row, format_with_line_numbers, ChangeKind, DiffLine, DiffStats};
pub use crate::error::AssistantError;
pub use crate::source::{collect_sources, load_document, LoadedSources, SourceDocument};

use clap::Subcommand;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::analysis::build_project_patterns_context;
use crate::utils::plural;

// argument parsing struct - shared by the CLI crate and anything embedding the core
#[derive(Parser, Debug, Clone)]
#[command(name = "abap-assistant")]
#[command(version, about = "project-aware abap code suggestions and refactor diffs", long_about = None)]
pub struct CoreCliArgs {
    /// path to a config file (defaults to .abap-assistant.toml in the project)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// print json instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: AssistantCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AssistantCommand {
    /// learn naming and style conventions from a project directory
    Learn {
        /// project directory
        path: PathBuf,
    },

    /// check documents against the conventions learned from the project
    #[command(alias = "analyze")]
    Analyse {
        /// project directory used for learning
        path: PathBuf,

        /// only report findings for this file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// report whether files look like abap source
    Detect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// print the learned conventions as ai prompt context
    Context {
        /// project directory
        path: PathBuf,
    },

    /// show a numbered line diff between two versions of a file
    Diff {
        original: PathBuf,
        revised: PathBuf,

        /// overwrite ORIGINAL with REVISED after confirmation
        #[arg(long)]
        apply: bool,

        /// apply without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// findings for one document, as printed or serialised
#[derive(Debug, Serialize)]
pub struct DocumentFindings {
    pub document: String,
    pub findings: Vec<Finding>,
}

#[derive(Serialize)]
struct LearnOutput<'a> {
    report: &'a LearningReport,
    profile: &'a ProjectPatternProfile,
}

#[derive(Serialize)]
struct DetectOutput {
    file: String,
    abap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct DiffOutput<'a> {
    stats: DiffStats,
    lines: &'a [DiffLine],
}

/// a learned session plus the documents it was learned from
pub struct LearnedProject {
    pub session: AnalysisSession,
    pub documents: Vec<SourceDocument>,
}

// the core entrypoint: resolve config, then dispatch to the requested flow
pub fn execute_assistant_flow(args: CoreCliArgs) -> Result<()> {
    dotenv().ok();

    match &args.command {
        AssistantCommand::Learn { path } => {
            let config = resolve_config(&args, Some(path.as_path()))?;
            run_learn(path, &config, args.json)
        }
        AssistantCommand::Analyse { path, file } => {
            let config = resolve_config(&args, Some(path.as_path()))?;
            run_analyse(path, file.as_deref(), &config, args.json)
        }
        AssistantCommand::Detect { files } => {
            let config = resolve_config(&args, None)?;
            run_detect(files, &config, args.json)
        }
        AssistantCommand::Context { path } => {
            let config = resolve_config(&args, Some(path.as_path()))?;
            run_context(path, &config)
        }
        AssistantCommand::Diff {
            original,
            revised,
            apply,
            yes,
        } => run_diff(original, revised, *apply, *yes, args.json),
    }
}

fn resolve_config(args: &CoreCliArgs, project_root: Option<&Path>) -> Result<Config> {
    Config::load(args.config.as_deref(), project_root).context("failed to load configuration")
}

/// walk a project, keep the documents that look like abap and learn from them
pub fn learn_project(root: &Path, config: &Config) -> Result<LearnedProject> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("learning project patterns...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let loaded = collect_sources(root, config)
        .with_context(|| format!("failed to read sources under {}", root.display()))?;

    let budget = config.analysis.detection_line_budget;
    let total = loaded.documents.len();
    let documents: Vec<SourceDocument> = if config.analysis.require_detection {
        loaded
            .documents
            .into_iter()
            .filter(|doc| {
                let is_abap = classify_document(doc, budget);
                if !is_abap {
                    debug!("{} does not look like abap, ignoring", doc.name);
                }
                is_abap
            })
            .collect()
    } else {
        loaded.documents
    };

    let sources = LoadedSources {
        documents,
        skipped: loaded.skipped,
    };
    let miner = PatternMiner::default().with_top_prefixes(config.analysis.top_prefixes);
    let mut session = AnalysisSession::new(miner);
    session.learn_from_sources(&sources);

    spinner.finish_and_clear();
    info!(
        "learned from {} of {} documents under {}",
        sources.documents.len(),
        total,
        root.display()
    );

    Ok(LearnedProject {
        session,
        documents: sources.documents,
    })
}

fn run_learn(path: &Path, config: &Config, json: bool) -> Result<()> {
    let learned = learn_project(path, config)?;
    let report = learned.session.report();
    let profile = learned.session.profile();

    if json {
        let output = LearnOutput { report, profile };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{}",
        style(format!(
            "learned from {} document{} ({} line{} classified)",
            report.documents_analysed,
            plural(report.documents_analysed),
            report.lines_classified,
            plural(report.lines_classified)
        ))
        .cyan()
        .bold()
    );
    if report.documents_skipped > 0 {
        println!(
            "{}",
            style(format!(
                "⚠️  {} file{} could not be read",
                report.documents_skipped,
                plural(report.documents_skipped)
            ))
            .yellow()
        );
    }
    if report.documents_partial > 0 {
        println!(
            "{}",
            style(format!(
                "⚠️  {} document{} only partially read",
                report.documents_partial,
                plural(report.documents_partial)
            ))
            .yellow()
        );
    }

    if profile.common_prefixes.is_empty() {
        println!("{}", style("no naming prefixes learned").dim());
    } else {
        println!("\n{}", style("common prefixes:").cyan().bold());
        for prefix in &profile.common_prefixes {
            let count = profile.naming_count(&format!("{}{}", analysis::profile::PREFIX_BUCKET, prefix));
            println!("  {} {}", style(format!("{prefix}_")).green(), style(format!("({count})")).dim());
        }
    }

    if !profile.style_frequency.is_empty() {
        println!("\n{}", style("style counts:").cyan().bold());
        for (category, count) in &profile.style_frequency {
            println!("  {category}: {count}");
        }
    }

    Ok(())
}

fn run_analyse(path: &Path, file: Option<&Path>, config: &Config, json: bool) -> Result<()> {
    let learned = learn_project(path, config)?;
    let profile = learned.session.profile();

    let targets: Vec<SourceDocument> = match file {
        Some(file) => vec![
            load_document(file).with_context(|| format!("failed to read {}", file.display()))?,
        ],
        None => learned.documents.clone(),
    };

    let results: Vec<DocumentFindings> = targets
        .iter()
        .map(|doc| DocumentFindings {
            document: doc
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| doc.name.clone()),
            findings: analyse_document(doc, profile),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let total: usize = results.iter().map(|r| r.findings.len()).sum();
    for result in results.iter().filter(|r| !r.findings.is_empty()) {
        println!("\n{}", style(&result.document).cyan().bold());
        for finding in &result.findings {
            let label = format!("{:>4} {:<7}", finding.line_number, finding.severity);
            let label = match finding.severity {
                Severity::Info => style(label).blue(),
                Severity::Warning => style(label).yellow(),
                Severity::Error => style(label).red(),
            };
            println!("{} {}", label, finding.message);
            println!("             {}", style(&finding.detail).dim());
            if let Some(fix) = &finding.suggested_fix {
                println!("             {} {}", style("fix:").green(), fix.trim());
            }
        }
    }

    println!(
        "\n{}",
        style(format!(
            "{} finding{} in {} document{}",
            total,
            plural(total),
            results.len(),
            plural(results.len())
        ))
        .green()
        .bold()
    );
    Ok(())
}

fn run_detect(files: &[PathBuf], config: &Config, json: bool) -> Result<()> {
    let budget = config.analysis.detection_line_budget;
    let mut outputs = Vec::with_capacity(files.len());

    for file in files {
        let output = match load_document(file) {
            Ok(doc) => DetectOutput {
                file: file.display().to_string(),
                abap: Some(classify_document(&doc, budget)),
                error: None,
            },
            Err(e) => DetectOutput {
                file: file.display().to_string(),
                abap: None,
                error: Some(e.to_string()),
            },
        };
        outputs.push(output);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
        return Ok(());
    }

    for output in &outputs {
        match (output.abap, &output.error) {
            (Some(true), _) => println!("{} {}", style("abap").green().bold(), output.file),
            (Some(false), _) => println!("{} {}", style("other").dim(), output.file),
            (None, Some(err)) => println!("{} {}: {}", style("error").red().bold(), output.file, err),
            (None, None) => {}
        }
    }
    Ok(())
}

fn run_context(path: &Path, config: &Config) -> Result<()> {
    let learned = learn_project(path, config)?;
    let context = build_project_patterns_context(learned.session.profile());
    if context.is_empty() {
        println!("{}", style("no project patterns learned").dim());
    } else {
        print!("{context}");
    }
    Ok(())
}

fn run_diff(original: &Path, revised: &Path, apply: bool, yes: bool, json: bool) -> Result<()> {
    let original_doc = load_document(original)
        .with_context(|| format!("failed to read {}", original.display()))?;
    let revised_doc = load_document(revised)
        .with_context(|| format!("failed to read {}", revised.display()))?;

    let diff = diff_lines(&original_doc.lines, &revised_doc.lines);
    let stats = DiffStats::from_diff(&diff);

    if json {
        let output = DiffOutput { stats, lines: &diff };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} {}",
            style(format!("{} → {}", original.display(), revised.display())).cyan().bold(),
            style(stats.to_string()).dim()
        );
        for line in &diff {
            let row = format_row(line);
            match line.kind() {
                ChangeKind::Added => println!("{}", style(row).green()),
                ChangeKind::Removed => println!("{}", style(row).red()),
                ChangeKind::Unchanged => println!("{row}"),
            }
        }
    }

    if !apply {
        return Ok(());
    }

    if !stats.has_changes() {
        println!("{}", style("no changes to apply").yellow());
        return Ok(());
    }

    if revised_doc.partial {
        anyhow::bail!(
            "refusing to apply {}: it could only be read partially",
            revised.display()
        );
    }

    let confirmed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("apply these changes to {}?", original.display()))
            .default(false)
            .interact()?;

    if confirmed {
        let mut contents = revised_doc.text();
        if !revised_doc.lines.is_empty() {
            contents.push('\n');
        }
        fs::write(original, contents)
            .with_context(|| format!("failed to write {}", original.display()))?;
        println!("{}", style(format!("✅ updated {}", original.display())).green().bold());
    } else {
        println!("{}", style("changes not applied").yellow());
    }
    Ok(())
}
