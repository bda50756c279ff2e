//! Manifest reconciliation: fetch every declared patch, then prune stale
//! `.patch` files so the manifest stays the single source of truth for the
//! output tree.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fetch::{Fetcher, review_url};
use crate::manifest::{self, ManifestEntry, slug};
use crate::substitute;

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
    pub base_url: String,
}

#[derive(Debug, Default)]
pub struct SyncReport {
    /// Every path a current manifest entry accounts for.
    pub expected: BTreeSet<PathBuf>,
    /// Stale `.patch` files deleted from the output tree.
    pub removed: Vec<PathBuf>,
}

fn url_basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

pub fn sync_patches(fetcher: &Fetcher, opts: &SyncOptions) -> Result<SyncReport> {
    let entries = manifest::load(&opts.manifest)?;

    let mut report = SyncReport::default();
    for entry in entries {
        match entry {
            ManifestEntry::Phabricator { id, name, replaces } => {
                let output_file = opts
                    .output_dir
                    .join("firefox")
                    .join(format!("{}.patch", slug(&name)));
                println!(
                    "Processing Phabricator patch: {id} -> {}",
                    output_file.display()
                );
                fetcher.download_to(&review_url(&opts.base_url, &id), &output_file)?;
                substitute::apply_replacements(&output_file, &replaces)?;
                report.expected.insert(output_file);
            }
            ManifestEntry::Remote { url, dest, replaces } => {
                let output_file = opts.output_dir.join(&dest).join(url_basename(&url));
                fetcher.download_to(&url, &output_file)?;
                substitute::apply_replacements(&output_file, &replaces)?;
                report.expected.insert(output_file);
            }
            ManifestEntry::Local { path } => {
                println!("Local patch: {path}");
                report.expected.insert(opts.output_dir.join(path));
            }
        }
    }

    prune_stale_patches(opts, &mut report)?;
    Ok(report)
}

fn prune_stale_patches(opts: &SyncOptions, report: &mut SyncReport) -> Result<()> {
    if !opts.output_dir.is_dir() {
        return Ok(());
    }
    for entry in walkdir::WalkDir::new(&opts.output_dir) {
        let entry = entry.map_err(|e| Error::msg(format!("walkdir error: {e}")))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !entry.file_name().to_string_lossy().ends_with(".patch") {
            continue;
        }
        let path = entry.path();
        if report.expected.contains(path) {
            continue;
        }
        println!("Removing unexpected patch file: {}", path.display());
        fs::remove_file(path)
            .map_err(|e| Error::msg(format!("failed to remove {}: {e}", path.display())))?;
        report.removed.push(path.to_path_buf());
    }
    Ok(())
}
