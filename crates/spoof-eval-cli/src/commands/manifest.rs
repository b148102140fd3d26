//! Manifest inspection command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use spoof_eval::Manifest;

pub fn run(path: PathBuf, check_files: bool, verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("Loading manifest: {}", path.display());
    }

    let manifest = Manifest::load(&path)
        .with_context(|| format!("Failed to load manifest {}", path.display()))?;

    let (bonafide, spoof) = manifest.class_counts();
    println!("Manifest: {}", path.display());
    println!("{:-<60}", "");
    println!("{:<20} {:>10}", "Entries", manifest.len());
    println!(
        "{:<20} {:>10} ({:.1}%)",
        "Bonafide",
        bonafide,
        pct(bonafide, manifest.len())
    );
    println!(
        "{:<20} {:>10} ({:.1}%)",
        "Spoof",
        spoof,
        pct(spoof, manifest.len())
    );

    if let Some(entry) = manifest.entries.first() {
        if !entry.extra.is_empty() {
            let mut columns: Vec<&str> = entry.extra.keys().map(String::as_str).collect();
            columns.sort_unstable();
            println!("{:<20} {}", "Extra columns", columns.join(", "));
        }
    }

    if bonafide == 0 || spoof == 0 {
        println!("Note: single-class manifest; EER/AUC will not be computable.");
    }

    if check_files {
        let missing: Vec<_> = manifest
            .entries
            .iter()
            .filter(|e| !e.audio_path.exists())
            .collect();
        println!("{:<20} {:>10}", "Missing files", missing.len());
        for entry in missing.iter().take(10) {
            eprintln!("  missing: {}", entry.audio_path.display());
        }
        if missing.len() > 10 {
            eprintln!("  ... and {} more", missing.len() - 10);
        }
    }

    Ok(())
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
