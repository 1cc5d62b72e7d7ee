//! Input discovery and output naming.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File extensions the CLI reads, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Lowercased extension of `path`, if any.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn is_image(path: &Path) -> bool {
    extension(path).is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn ext_or(path: &Path, force_ext: Option<&str>) -> String {
    match force_ext {
        Some(e) => e.to_string(),
        None => path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

fn join_name(stem: &str, ext: &str) -> String {
    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{ext}")
    }
}

/// `dir/photo.png` + `_m` → `dir/photo_m.png`, optionally replacing the extension.
pub fn with_suffix(path: &Path, suffix: &str, force_ext: Option<&str>) -> PathBuf {
    let name = join_name(&format!("{}{}", stem(path), suffix), &ext_or(path, force_ext));
    path.with_file_name(name)
}

/// `dir/photo.png` + `restored_` → `dir/restored_photo.png`, optionally replacing the extension.
pub fn with_prefix(path: &Path, prefix: &str, force_ext: Option<&str>) -> PathBuf {
    let name = join_name(&format!("{}{}", prefix, stem(path)), &ext_or(path, force_ext));
    path.with_file_name(name)
}

/// One file to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub input: PathBuf,
    /// Edited copy the mask is derived from; only used when encoding.
    pub mask: Option<PathBuf>,
    pub output: PathBuf,
}

/// Images directly inside `dir`, sorted by name, whose stem neither ends with
/// one of `skip_suffixes` nor starts with one of `skip_prefixes`.
pub fn discover(dir: &Path, skip_suffixes: &[&str], skip_prefixes: &[&str]) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("reading directory {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() || !is_image(&path) {
            continue;
        }
        let stem = stem(&path);
        if skip_suffixes.iter().any(|s| stem.ends_with(s))
            || skip_prefixes.iter().any(|p| stem.starts_with(p))
        {
            continue;
        }
        found.push(path);
    }
    found.sort();
    Ok(found)
}

/// Encode tasks: `photo.png` with mask `photo_m.png` into `photo_o.jpg`.
pub fn encode_tasks(
    dir: &Path,
    input: Option<PathBuf>,
    mask: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<Vec<Task>> {
    let inputs = match input {
        Some(input) => vec![(input, mask, output)],
        None => discover(dir, &["_m", "_o"], &[])?
            .into_iter()
            .map(|p| (p, None, None))
            .collect(),
    };
    Ok(inputs
        .into_iter()
        .map(|(input, mask, output)| Task {
            mask: Some(mask.unwrap_or_else(|| with_suffix(&input, "_m", None))),
            output: output.unwrap_or_else(|| with_suffix(&input, "_o", Some("jpg"))),
            input,
        })
        .collect())
}

/// Decode tasks: `photo_o.jpg` into `restored_photo_o.jpg`.
pub fn decode_tasks(dir: &Path, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<Vec<Task>> {
    let inputs = match input {
        Some(input) => vec![(input, output)],
        None => discover(dir, &["_r"], &["restored_"])?
            .into_iter()
            .map(|p| (p, None))
            .collect(),
    };
    Ok(inputs
        .into_iter()
        .map(|(input, output)| Task {
            mask: None,
            output: output.unwrap_or_else(|| with_prefix(&input, "restored_", Some("jpg"))),
            input,
        })
        .collect())
}
