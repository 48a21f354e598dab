use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

/// check if a file should be analysed based on its name and size
pub fn should_analyse_file(path: &Path, max_size: u64) -> Result<bool> {
    if !path.exists() || path.is_dir() {
        return Ok(false);
    }

    let metadata = fs::metadata(path)?;
    if metadata.len() > max_size {
        return Ok(false);
    }

    lazy_static! {
        // generated or packed artefacts
        static ref IGNORED_NAMES: Regex = Regex::new(
            r"(?i)(\.min\.|\.bundle\.|\.packed\.|\.compiled\.)"
        ).unwrap();

        // common binary file extensions
        static ref BINARY_EXTENSIONS: Regex = Regex::new(
            r"(?i)^(jpg|jpeg|png|gif|bmp|ico|svg|webp|mp3|mp4|avi|mov|woff|woff2|eot|ttf|otf|exe|dll|so|dylib|bin|dat|o|obj|lib|a|class|jar|war|ear|zip|tar|gz|rar|7z|pdf|sap)$"
        ).unwrap();
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if IGNORED_NAMES.is_match(&file_name) {
        return Ok(false);
    }

    if let Some(ext) = path.extension() {
        if BINARY_EXTENSIONS.is_match(&ext.to_string_lossy()) {
            return Ok(false);
        }
    }

    Ok(true)
}

/// plural suffix for counts in user-facing summaries
pub fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_and_minified_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("logo.png");
        let min = dir.path().join("app.min.js");
        let abap = dir.path().join("zcl_report.abap");
        for p in [&png, &min, &abap] {
            fs::write(p, "x").unwrap();
        }

        assert!(!should_analyse_file(&png, 1024).unwrap());
        assert!(!should_analyse_file(&min, 1024).unwrap());
        assert!(should_analyse_file(&abap, 1024).unwrap());
        assert!(!should_analyse_file(&abap, 0).unwrap());
    }

    #[test]
    fn plural_suffix() {
        assert_eq!(plural(1), "");
        assert_eq!(plural(0), "s");
        assert_eq!(plural(3), "s");
    }
}
