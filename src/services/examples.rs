//! Example gallery loaded from disk
//!
//! A gallery directory holds one subdirectory per example; every regular file
//! inside becomes a document named after the file.

use std::fs;
use std::io;
use std::path::Path;

/// A named set of documents that can replace the whole session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleSet {
    pub title: String,
    /// Ordered `(name, content)` pairs; the first one is shown first
    pub files: Vec<(String, String)>,
}

impl ExampleSet {
    pub fn new(title: impl Into<String>, files: Vec<(String, String)>) -> Self {
        Self {
            title: title.into(),
            files,
        }
    }
}

/// Load one example directory, files sorted by name
pub fn load_example_dir(dir: &Path) -> io::Result<ExampleSet> {
    let title = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match fs::read_to_string(entry.path()) {
            Ok(content) => files.push((name, content)),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!("Skipping non-UTF-8 example file {:?}", entry.path());
            }
            Err(e) => return Err(e),
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(ExampleSet { title, files })
}

/// Every example under `root`, sorted by title
pub fn discover_examples(root: &Path) -> io::Result<Vec<ExampleSet>> {
    let mut sets = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            sets.push(load_example_dir(&entry.path())?);
        }
    }
    sets.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(sets)
}
