// source module - materialises project files into line-based documents

use crate::config::Config;
use crate::error::AssistantError;
use crate::utils::should_analyse_file;
use encoding_rs::UTF_8;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// a source file already read into memory, one entry per line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDocument {
    pub name: String,
    pub path: Option<PathBuf>,
    pub lines: Vec<String>,
    /// true when reading stopped early; `lines` holds what was read
    pub partial: bool,
}

impl SourceDocument {
    /// build a document from in-memory text
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            path: None,
            lines: text.lines().map(str::to_string).collect(),
            partial: false,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// a file that could not be turned into a document
#[derive(Debug, Clone, Serialize)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub reason: String,
}

/// result of walking a project directory
///
/// partially read documents stay in `documents` with `partial` set; only
/// files that produced no document at all are listed in `skipped`.
#[derive(Debug, Default)]
pub struct LoadedSources {
    pub documents: Vec<SourceDocument>,
    pub skipped: Vec<SkippedSource>,
}

/// read a single file line by line
///
/// a read error after the first line keeps what was read so far and marks
/// the document partial; an error opening the file is returned.
pub fn load_document(path: &Path) -> Result<SourceDocument, AssistantError> {
    if !path.is_file() {
        return Err(AssistantError::NotAFile(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| AssistantError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut partial = false;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let mut bytes = buf.as_slice();
                if let Some(stripped) = bytes.strip_suffix(b"\n") {
                    bytes = stripped;
                }
                if let Some(stripped) = bytes.strip_suffix(b"\r") {
                    bytes = stripped;
                }
                lines.push(decode_line_content(bytes));
            }
            Err(e) => {
                if lines.is_empty() {
                    return Err(AssistantError::Io {
                        path: path.to_path_buf(),
                        source: e,
                    });
                }
                warn!(
                    "stopped reading {} after {} lines: {}",
                    path.display(),
                    lines.len(),
                    e
                );
                partial = true;
                break;
            }
        }
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(SourceDocument {
        name,
        path: Some(path.to_path_buf()),
        lines,
        partial,
    })
}

/// walk a project directory and read every candidate file
///
/// unreadable files end up in `skipped`, they never abort the walk.
pub fn collect_sources(root: &Path, config: &Config) -> Result<LoadedSources, AssistantError> {
    if !root.is_dir() {
        return Err(AssistantError::MissingSourceRoot(root.to_path_buf()));
    }

    let max_size = config.max_file_size_bytes();
    let max_files = config.analysis.max_files;
    let skip_dirs = &config.source.skip_dirs;
    let mut loaded = LoadedSources::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !skip_dirs
                    .iter()
                    .any(|d| entry.file_name().to_string_lossy() == d.as_str())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn!("skipping {}: {}", path.display(), e);
                loaded.skipped.push(SkippedSource {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        match should_analyse_file(path, max_size) {
            Ok(true) => {}
            Ok(false) => {
                debug!("ignoring {}", path.display());
                continue;
            }
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                loaded.skipped.push(SkippedSource {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        }

        if loaded.documents.len() >= max_files {
            debug!("reached max_files ({}), stopping walk", max_files);
            break;
        }

        match load_document(path) {
            Ok(document) => loaded.documents.push(document),
            Err(e) => {
                warn!("skipping unreadable document {}: {}", path.display(), e);
                loaded.skipped.push(SkippedSource {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        "collected {} documents, skipped {}",
        loaded.documents.len(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

/// decode line content, falling back to lossy conversion on invalid utf-8
fn decode_line_content(content: &[u8]) -> String {
    let (cow, had_errors) = UTF_8.decode_without_bom_handling(content);
    if had_errors {
        String::from_utf8_lossy(content).to_string()
    } else {
        cow.into_owned()
    }
}
