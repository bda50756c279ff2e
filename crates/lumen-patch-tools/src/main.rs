use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lumen_patch_tools::Result;
use lumen_patch_tools::dumps::{self, MergeOptions};
use lumen_patch_tools::fetch::{DEFAULT_REVIEW_BASE_URL, Fetcher, review_url};
use lumen_patch_tools::sync::{SyncOptions, sync_patches};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Download a single review-system patch by ID
    Download {
        /// Review-system ID of the patch to fetch
        id: String,
        /// Output filename (without the .patch suffix); defaults to phab_<ID>
        name: Option<String>,
        /// Directory the patch file is written into
        #[arg(long, default_value = "src/firefox-patches")]
        output_dir: PathBuf,
        /// Review-system base URL
        #[arg(long, default_value = DEFAULT_REVIEW_BASE_URL)]
        base_url: String,
    },
    /// Reconcile the external-patches tree against its manifest
    Sync {
        /// Root of the external-patches output tree
        #[arg(long, default_value = "src/external-patches")]
        output_dir: PathBuf,
        /// Manifest path; defaults to <output_dir>/manifest.json
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Review-system base URL
        #[arg(long, default_value = DEFAULT_REVIEW_BASE_URL)]
        base_url: String,
    },
    /// Merge dump update files into the engine settings dumps
    MergeDumps {
        /// Directory of update files describing records to remove
        #[arg(long, default_value = "configs/dumps")]
        updates_dir: PathBuf,
        /// Directory of the original dumps, rewritten in place
        #[arg(long, default_value = "engine/services/settings/dumps/main")]
        dumps_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    match args.cmd {
        Command::Download {
            id,
            name,
            output_dir,
            base_url,
        } => cmd_download(&id, name.as_deref(), &output_dir, &base_url),
        Command::Sync {
            output_dir,
            manifest,
            base_url,
        } => cmd_sync(&output_dir, manifest, base_url),
        Command::MergeDumps {
            updates_dir,
            dumps_dir,
        } => cmd_merge_dumps(updates_dir, dumps_dir),
    }
}

fn cmd_download(id: &str, name: Option<&str>, output_dir: &PathBuf, base_url: &str) -> Result<()> {
    let stem = name.map_or_else(|| format!("phab_{id}"), ToOwned::to_owned);
    let output_file = output_dir.join(format!("{stem}.patch"));
    let fetcher = Fetcher::new()?;
    fetcher.download_to(&review_url(base_url, id), &output_file)
}

fn cmd_sync(output_dir: &PathBuf, manifest: Option<PathBuf>, base_url: String) -> Result<()> {
    let opts = SyncOptions {
        manifest: manifest.unwrap_or_else(|| output_dir.join("manifest.json")),
        output_dir: output_dir.clone(),
        base_url,
    };
    let fetcher = Fetcher::new()?;
    let report = sync_patches(&fetcher, &opts)?;
    println!(
        "Sync complete: {} expected, {} removed",
        report.expected.len(),
        report.removed.len()
    );
    Ok(())
}

fn cmd_merge_dumps(updates_dir: PathBuf, dumps_dir: PathBuf) -> Result<()> {
    let opts = MergeOptions {
        updates_dir,
        dumps_dir,
    };
    let updated = dumps::update_dumps(&opts)?;
    println!("Merged {} dump file(s)", updated.len());
    Ok(())
}
