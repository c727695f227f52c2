//! File plumbing for the `gapscan` binary: page bundles in, reports out.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use gapscan_core::types::PageInput;
use gapscan_engine::PageReport;

pub const REPORT_SUFFIX: &str = ".report.json";

pub fn read_page(path: &Path) -> Result<PageInput> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing page bundle {}", path.display()))
}

pub fn write_report(path: &Path, report: &PageReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn is_page_bundle(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
        && !path.to_string_lossy().ends_with(REPORT_SUFFIX)
}

/// All `*.json` page bundles under `root`, sorted. Earlier reports are ignored.
pub fn list_page_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_page_bundle(p))
        .collect();
    files.sort();
    files
}

/// `<stem>.report.json`, next to the input or inside `out_dir`.
pub fn report_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "page".to_string());
    let name = format!("{stem}{REPORT_SUFFIX}");
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

pub fn summary_line(report: &PageReport) -> String {
    let top = report
        .ranked_gaps
        .first()
        .map(|g| format!("top gap \"{}\" ({:.3})", g.representative, g.opportunity_score))
        .unwrap_or_else(|| "no gaps".to_string());
    format!(
        "{}: {} clusters, {} gaps, {} noise, {} skipped, {}",
        report.page_id,
        report.clusters.len(),
        report.candidates.iter().filter(|c| c.has_gap).count(),
        report.noise.len(),
        report.skipped_keywords.len(),
        top
    )
}
