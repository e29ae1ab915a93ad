//! Batch orchestration
//!
//! Discovers the PDF files directly inside one directory, stamps each of
//! them with its own file name, and merges the stamped copies into a single
//! packet named `annotatedMerged.pdf` in that directory. Intermediate
//! stamped copies either persist under an `annotated/` subdirectory or live
//! in a scratch directory that is cleaned up at the end of the run.
//!
//! Any failure while stamping or merging aborts the whole batch before the
//! merged output is put in place; the canonical output name is only ever
//! written by a completed merge.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::pdf::{merge_documents, stamp_document};
use crate::sort::sequence_key;

/// File name of the merged output, created in the input directory.
pub const MERGED_FILE_NAME: &str = "annotatedMerged.pdf";

/// Subdirectory holding the stamped copies when they are kept.
pub const ANNOTATED_DIR_NAME: &str = "annotated";

/// Prefix applied to every stamped copy. The prefix is the same for every
/// artifact, so sorting artifact names yields the same relative order as
/// sorting the original names.
pub const ARTIFACT_PREFIX: &str = "annotated_";

/// Options for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory whose immediate `*.pdf` children are processed
    pub directory: PathBuf,
    /// Keep the stamped copies in an `annotated/` subdirectory instead of
    /// deleting them after the merge
    pub keep_annotated: bool,
    /// Open the directory in the system file manager after a successful run
    pub reveal_after: bool,
}

/// What a successful batch run produced
#[derive(Debug)]
pub struct BatchSummary {
    /// Path of the merged output file
    pub merged_path: PathBuf,
    /// Number of input files processed
    pub input_count: usize,
    /// Page count of the merged output
    pub page_count: usize,
}

/// Run the whole pipeline over one directory.
///
/// Fails with [`Error::NoInput`] when the directory holds no PDF files.
/// Stamping and merging failures abort the batch; at most some intermediate
/// artifacts may remain on disk, never a partially written merged output.
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary> {
    let inputs = discover_inputs(&options.directory)?;

    let (artifact_dir, _scratch) = if options.keep_annotated {
        let dir = options.directory.join(ANNOTATED_DIR_NAME);
        fs::create_dir_all(&dir)?;
        (dir, None)
    } else {
        let scratch = tempfile::tempdir()?;
        (scratch.path().to_path_buf(), Some(scratch))
    };

    let mut artifacts = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let label = file_name_of(input);
        let mut stamped = stamp_document(input, &label)?;

        let artifact_path = artifact_dir.join(format!("{ARTIFACT_PREFIX}{label}"));
        stamped.compress();
        stamped.save(&artifact_path)?;
        artifacts.push(artifact_path);
    }

    // The merge order is recomputed from the artifact names; those are the
    // strings that actually govern the page order of the packet
    artifacts.sort_by_cached_key(|path| sequence_key(&file_name_of(path)));

    let merged_path = options.directory.join(MERGED_FILE_NAME);
    let staging = NamedTempFile::new_in(&options.directory)?;
    let page_count = merge_documents(&artifacts, staging.path())?;
    staging
        .persist(&merged_path)
        .map_err(|persist| Error::Io(persist.error))?;

    if !options.keep_annotated {
        for path in &artifacts {
            if let Err(e) = fs::remove_file(path) {
                eprintln!(
                    "Warning: could not remove intermediate {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    if options.reveal_after {
        reveal_directory(&options.directory);
    }

    Ok(BatchSummary {
        merged_path,
        input_count: inputs.len(),
        page_count,
    })
}

/// List the `*.pdf` files directly inside `directory`, in natural order of
/// their file names. The merged output's own name is excluded so a re-run
/// processes the same inputs as the first run.
fn discover_inputs(directory: &Path) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(Error::FileNotFound(directory.to_path_buf()));
    }

    let pattern = format!("{}/*.pdf", Pattern::escape(&directory.to_string_lossy()));
    let entries = glob::glob(&pattern).map_err(|e| Error::InvalidGlob(e.to_string()))?;

    let mut inputs = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() && file_name_of(&path) != MERGED_FILE_NAME {
                    inputs.push(path);
                }
            }
            Err(e) => eprintln!("Warning: skipping unreadable entry: {}", e),
        }
    }

    if inputs.is_empty() {
        return Err(Error::NoInput(directory.to_path_buf()));
    }

    inputs.sort_by_cached_key(|path| sequence_key(&file_name_of(path)));
    Ok(inputs)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Open the directory in the system file manager. Failure to do so is a
/// diagnostic, never an error: the packet already exists at this point.
fn reveal_directory(directory: &Path) {
    if let Err(e) = spawn_file_manager(directory) {
        eprintln!(
            "Warning: could not open the file manager for {}: {}",
            directory.display(),
            e
        );
    }
}

#[cfg(target_os = "macos")]
fn spawn_file_manager(directory: &Path) -> std::io::Result<()> {
    std::process::Command::new("open")
        .arg(directory)
        .spawn()
        .map(|_| ())
}

#[cfg(target_os = "linux")]
fn spawn_file_manager(directory: &Path) -> std::io::Result<()> {
    std::process::Command::new("xdg-open")
        .arg(directory)
        .spawn()
        .map(|_| ())
}

#[cfg(target_os = "windows")]
fn spawn_file_manager(directory: &Path) -> std::io::Result<()> {
    std::process::Command::new("explorer")
        .arg(directory)
        .spawn()
        .map(|_| ())
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn spawn_file_manager(_directory: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "no file manager integration on this platform",
    ))
}
