//! CLI Command Implementations
//!
//! Implements the actual logic behind the command-line flags.

use std::path::{Path, PathBuf};

use log::info;

use crate::codec::known_codecs;
use crate::config::EvalSettings;
use crate::dataset::LocalDataset;
use crate::error::Result;
use crate::eval::Evaluator;
use crate::report::{EvaluationReport, ResourceMonitor};

/// Evaluate every selected model of a local dataset and write the results file.
///
/// Returns the path of the written file.
pub fn evaluate(
    data_dir: &Path,
    dataset_name: &str,
    settings: EvalSettings,
    output_dir: &Path,
) -> Result<PathBuf> {
    let mut monitor = ResourceMonitor::new();
    println!("Initial RAM used: {}\n", monitor.rss_display());

    info!(
        "Loading dataset {} from {} ({:?} mode)",
        dataset_name,
        data_dir.display(),
        settings.mode
    );
    let dataset = LocalDataset::open(data_dir, dataset_name, settings.mode.is_streaming())?;
    let evaluator = Evaluator::new(&dataset, settings);

    let results = evaluator.run_with(|outcome| {
        println!(
            "RAM used after processing {}: {}",
            outcome.model,
            monitor.rss_display()
        );
        println!(
            "Time taken for {}: {:.2} seconds",
            outcome.model,
            outcome.elapsed.as_secs_f64()
        );
        println!(
            "Entries evaluated: {} | skipped (too long): {}",
            outcome.entries_evaluated, outcome.entries_skipped
        );
        for (name, value) in &outcome.metrics {
            println!("  {}: {:.4}", name, value);
        }
        println!();
    })?;

    println!(
        "Total execution time: {:.2} seconds",
        monitor.elapsed().as_secs_f64()
    );
    println!("Final RAM used: {}", monitor.rss_display());

    let path = EvaluationReport::new(dataset_name, results).write(output_dir)?;
    println!("Results saved to {}", path.display());

    Ok(path)
}

/// Print the known codec configurations.
pub fn list_codecs() -> Result<()> {
    println!("{:<20} {:<22} {:>10} {:>10}", "SETTING", "MODEL", "KBPS", "RATE");
    println!("{:-<65}", "");
    for codec in known_codecs() {
        println!(
            "{:<20} {:<22} {:>10} {:>10}",
            codec.setting, codec.model, codec.target_bandwidth_kbps, codec.sampling_rate
        );
    }
    Ok(())
}
