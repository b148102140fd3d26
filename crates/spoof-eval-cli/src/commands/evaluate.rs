//! Evaluate command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use spoof_eval::{EvalSession, EvalSetup, ScorerRegistry};

pub fn run(config_path: PathBuf, verbose: bool) -> Result<()> {
    let setup = EvalSetup::load(&config_path)
        .with_context(|| format!("Failed to load setup {}", config_path.display()))?;

    let registry = ScorerRegistry::with_builtins();
    let scorer = registry
        .build(&setup.scorer.name, &setup.scorer.args)
        .context("Failed to build scorer")?;
    if verbose {
        eprintln!("Using scorer: {}", scorer.name());
    }

    let datasets = setup.resolve_datasets()?;
    let run_name = setup.run_name();
    let session = EvalSession::new(setup.eval_config()?, scorer);

    println!("Evaluating {} dataset(s) in '{}'", datasets.len(), run_name);
    let report = session.evaluate_group(&run_name, &datasets)?;

    for dataset in &report.datasets {
        println!("\n--- {} ---", dataset.name);
        if dataset.num_failed > 0 {
            println!(
                "  ({} of {} examples failed to load and were dropped)",
                dataset.num_failed,
                dataset.num_scored + dataset.num_failed
            );
        }
        super::print_metrics(&dataset.metrics);
    }

    for skipped in &report.skipped {
        eprintln!("Warning: skipped {}: {}", skipped.name, skipped.reason);
    }

    println!("\n--- Summary for '{}' ---", run_name);
    for dataset in &report.datasets {
        println!("{}", super::summary_line(&dataset.name, &dataset.metrics));
    }
    match &report.average {
        Some(avg) => {
            println!("Average over {} two-class dataset(s):", report.datasets.iter().filter(|d| d.metrics.has_roc()).count());
            super::print_metrics(avg);
        }
        None => println!("No two-class datasets were evaluated; no average to report."),
    }

    if verbose {
        eprintln!(
            "Results written to {}",
            setup.evaluation.results_dir.display()
        );
    }

    if let Some(latex_path) = &setup.evaluation.latex_output_path {
        session.write_latex_table(&report, latex_path)?;
        println!("LaTeX table written to {}", latex_path.display());
    }

    Ok(())
}
