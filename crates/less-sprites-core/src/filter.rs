use crate::error::{Result, SpriteError};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Resolves the candidate list against `base_dir`.
///
/// A single candidate must exist. If it is a directory it replaces `base_dir`
/// and its entries (directory order, not sorted, not recursive) become the new
/// candidates. Any other input is returned unchanged.
pub fn expand_candidates(base_dir: &Path, candidates: &[String]) -> Result<(PathBuf, Vec<String>)> {
    if let [single] = candidates {
        let path = base_dir.join(single);
        if !path.exists() {
            return Err(SpriteError::NotFound(path));
        }
        if path.is_dir() {
            let mut listing = Vec::new();
            for entry in WalkDir::new(&path).min_depth(1).max_depth(1) {
                let entry = entry.map_err(|e| {
                    SpriteError::Io(e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::other(format!("cannot list {}", path.display()))
                    }))
                })?;
                listing.push(entry.file_name().to_string_lossy().into_owned());
            }
            debug!(dir = ?path, entries = listing.len(), "expanded source directory");
            return Ok((path, listing));
        }
    }
    Ok((base_dir.to_path_buf(), candidates.to_vec()))
}

/// Keeps the candidates that look like images and are not the output image.
///
/// Entries are reduced to their base names, order is preserved. Fails with a
/// validation error if nothing survives.
pub fn filter_source_files(
    candidates: &[String],
    output_image_name: &str,
    extensions: &[String],
) -> Result<Vec<String>> {
    let output = base_name(output_image_name);
    let files: Vec<String> = candidates
        .iter()
        .map(|c| base_name(c))
        .filter(|name| *name != output && has_image_extension(name, extensions))
        .map(str::to_string)
        .collect();
    if files.is_empty() {
        return Err(SpriteError::Validation(
            "No valid source files were provided.".into(),
        ));
    }
    Ok(files)
}

/// Last path component, accepting both `/` and `\` separators.
pub(crate) fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

fn has_image_extension(name: &str, extensions: &[String]) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
