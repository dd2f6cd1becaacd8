mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::input::InputError;
use crate::model::classifiers::{ClassifierFamily, ClassifierKind, family_classifiers};
use crate::model::config::{ConfigError, EvalConfig};
use crate::pipeline::stage1_load::run_stage1;
use crate::pipeline::stage4_report::{ReportError, Stage4Input, write_reports};
use crate::pipeline::{build_summary, evaluate_classifiers};

#[derive(Debug, Parser)]
#[command(name = "kira-rotamer-eval", version)]
#[command(
    about = "Leave-one-out evaluation of dinucleotide rotamer classifiers",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate the configured classifier families and write one results CSV per family
    Run(RunArgs),
    /// List classifier families and their members
    List,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// JSON config file (defaults apply to every missing field)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Classifier family to evaluate; repeat to select several
    #[arg(long = "family", value_enum)]
    families: Vec<ClassifierFamily>,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Seed of the random-guess baseline
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() {
    logging::init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(&args),
        Command::List => {
            print!("{}", render_family_listing());
            Ok(())
        }
    };
    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), RunError> {
    let config = resolve_config(args)?;
    let stage1 = run_stage1(&config)?;

    for &family in &config.families {
        let classifiers = family_classifiers(family);
        tracing::info!(
            "family `{}`: {} classifiers, {} label sets",
            family,
            classifiers.len(),
            config.label_sets.len()
        );

        let outcome = evaluate_classifiers(&stage1, &classifiers, config.seed);
        if !outcome.failures.is_empty() {
            tracing::warn!(
                "family `{}`: {} of {} label sets failed",
                family,
                outcome.failures.len(),
                config.label_sets.len()
            );
        }

        let summary = build_summary(&stage1, family.id(), &classifiers, config.seed, &outcome);
        let input = Stage4Input {
            rows: &outcome.rows,
            summary: &summary,
        };
        write_reports(
            &input,
            &config.results_path(family),
            &config.summary_path(family),
        )?;
    }

    Ok(())
}

fn resolve_config(args: &RunArgs) -> Result<EvalConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => EvalConfig::load(path)?,
        None => EvalConfig::default(),
    };
    if !args.families.is_empty() {
        config.families = args.families.clone();
    }
    if let Some(out) = &args.out {
        config.output_dir = out.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn render_family_listing() -> String {
    let mut out = String::new();
    for family in ClassifierFamily::all() {
        out.push_str(&format!("{}\t{}\n", family.id(), family.description()));
        for spec in family_classifiers(family) {
            let kind = match spec.kind {
                ClassifierKind::Model(params) => format!("{params:?}"),
                ClassifierKind::RandomGuess => "baseline".to_string(),
            };
            out.push_str(&format!("  {}\t{}\n", spec.name, kind));
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
