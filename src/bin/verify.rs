/// Check an image-rename output folder against its source folder.
/// Usage: verify <source_dir> <dest_dir> [--prefix IMG_] [--json]
///
/// Checks:
/// 1. Every `{prefix}{n}{ext}` file in dest has a source file with the same content (SHA-256)
/// 2. Modified times match the source (within 1 second tolerance)
/// 3. Gaps in the numbering (left behind by failed copies)
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Parser)]
#[command(name = "verify", version, about = "Compare renamed copies with their originals")]
struct Cli {
    /// Folder the files were copied from
    source: PathBuf,

    /// Folder the renamed copies were written to
    dest: PathBuf,

    /// Prefix used for the renamed files
    #[arg(long, default_value = "IMG_")]
    prefix: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    source_files: usize,
    renamed_files: usize,
    matched: usize,
    /// Renamed files with no source of identical content
    unmatched: Vec<String>,
    /// (renamed file, source file, mtime difference in seconds)
    date_mismatch: Vec<(String, String, i64)>,
    /// Indices missing between 1 and the highest index found
    gaps: Vec<u64>,
}

struct Hashed {
    name: String,
    /// None when the file could not be read
    hash: Option<String>,
    mtime: Option<i64>,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    eprintln!("Source: {}", cli.source.display());
    eprintln!("Dest:   {}", cli.dest.display());

    let name_re = renamed_pattern(&cli.prefix)?;
    let mut renamed: Vec<(u64, PathBuf)> = Vec::new();
    for path in collect_files(&cli.dest)? {
        if let Some(index) = renamed_index(&name_re, &file_name(&path)) {
            renamed.push((index, path));
        }
    }
    renamed.sort_by_key(|(index, _)| *index);

    // When copying in place the renamed files live among the originals.
    let renamed_paths: HashSet<&PathBuf> = renamed.iter().map(|(_, p)| p).collect();
    let originals: Vec<PathBuf> = collect_files(&cli.source)?
        .into_iter()
        .filter(|p| !renamed_paths.contains(p))
        .collect();

    eprintln!("Hashing {} files (parallel)...", originals.len() + renamed.len());
    let source_hashes = hash_all(&originals);
    let renamed_only: Vec<PathBuf> = renamed.iter().map(|(_, p)| p.clone()).collect();
    let dest_hashes = hash_all(&renamed_only);

    let report = build_report(
        &source_hashes,
        &dest_hashes,
        renamed.iter().map(|(index, _)| *index),
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.unmatched.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Match every renamed copy to a source file of identical content.
/// A file that could not be hashed never matches.
fn build_report(
    source_hashes: &[Hashed],
    dest_hashes: &[Hashed],
    indices: impl Iterator<Item = u64>,
) -> Report {
    let mut by_hash: HashMap<&str, Vec<&Hashed>> = HashMap::new();
    for h in source_hashes {
        if let Some(hash) = &h.hash {
            by_hash.entry(hash.as_str()).or_default().push(h);
        }
    }

    let mut report = Report {
        source_files: source_hashes.len(),
        renamed_files: dest_hashes.len(),
        ..Report::default()
    };

    for copy in dest_hashes {
        let Some(candidates) = copy.hash.as_deref().and_then(|h| by_hash.get(h)) else {
            report.unmatched.push(copy.name.clone());
            continue;
        };
        report.matched += 1;

        let closest = candidates
            .iter()
            .find(|c| c.mtime == copy.mtime)
            .unwrap_or(&candidates[0]);
        if let (Some(s), Some(d)) = (closest.mtime, copy.mtime) {
            let diff = (s - d).abs();
            if diff > 1 {
                report
                    .date_mismatch
                    .push((copy.name.clone(), closest.name.clone(), diff));
            }
        }
    }

    report.gaps = numbering_gaps(indices);
    report
}

fn print_report(report: &Report) {
    println!("=== Verification Results ===");
    println!("Source files:  {}", report.source_files);
    println!("Renamed files: {}", report.renamed_files);
    println!();
    println!("Content matched: {}", report.matched);
    println!("No source match: {}", report.unmatched.len());
    println!("Date mismatch (>1s): {}", report.date_mismatch.len());
    println!("Numbering gaps: {}", report.gaps.len());

    if !report.unmatched.is_empty() {
        println!("\n--- No source match ---");
        for f in &report.unmatched {
            println!("  {}", f);
        }
    }

    if !report.date_mismatch.is_empty() {
        println!("\n--- Date mismatches (first 20) ---");
        for (copy, source, diff) in report.date_mismatch.iter().take(20) {
            println!("  {} vs {}, diff={}s", copy, source, diff);
        }
    }

    if !report.gaps.is_empty() {
        let gaps: Vec<String> = report.gaps.iter().map(|g| g.to_string()).collect();
        println!("\n--- Missing indices ---");
        println!("  {}", gaps.join(", "));
    }

    if report.unmatched.is_empty() {
        println!("\nAll renamed files matched by content!");
    }
}

/// `{prefix}{digits}{ext}` with the index in group 1.
fn renamed_pattern(prefix: &str) -> anyhow::Result<Regex> {
    Ok(Regex::new(&format!(r"^{}(\d+)(\.[^.]*)?$", regex::escape(prefix)))?)
}

/// Index of a renamed file, or None for unrelated names and out-of-range indices.
fn renamed_index(name_re: &Regex, name: &str) -> Option<u64> {
    let caps = name_re.captures(name)?;
    match caps[1].parse::<u64>() {
        Ok(index) => Some(index),
        Err(e) => {
            log::warn!("Skipping {}: index {} ({})", name, &caps[1], e);
            None
        }
    }
}

fn numbering_gaps(indices: impl Iterator<Item = u64>) -> Vec<u64> {
    let present: HashSet<u64> = indices.collect();
    let max = present.iter().copied().max().unwrap_or(0);
    (1..=max).filter(|i| !present.contains(i)).collect()
}

fn collect_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            result.push(path);
        }
    }
    Ok(result)
}

fn hash_all(paths: &[PathBuf]) -> Vec<Hashed> {
    paths
        .par_iter()
        .map(|path| Hashed {
            name: file_name(path),
            hash: file_hash(path)
                .map_err(|e| log::warn!("Cannot hash {}: {}", path.display(), e))
                .ok(),
            mtime: file_mtime(path),
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn file_hash(path: &Path) -> anyhow::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 65536];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn file_mtime(path: &Path) -> Option<i64> {
    fs::metadata(path)
        .ok()?
        .modified()
        .ok()?
        .duration_since(std::time::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs() as i64)
}
