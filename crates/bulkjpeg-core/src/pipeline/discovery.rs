//! Collect input files from paths given on the command line.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Discovers image files in directories.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

/// Information about a discovered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Discover input files across several paths, keeping argument order.
    ///
    /// Files named explicitly are kept whatever their extension, so the
    /// pipeline can report them as unsupported. Directories are walked
    /// recursively and only supported files are taken, sorted by path.
    /// A path reached twice is only listed once.
    pub fn discover_all(&self, paths: &[PathBuf]) -> Vec<DiscoveredFile> {
        let mut files: Vec<DiscoveredFile> = Vec::new();
        for path in paths {
            for file in self.discover(path) {
                if !files.iter().any(|f| f.path == file.path) {
                    files.push(file);
                }
            }
        }
        files
    }

    /// Discover files at a single path.
    pub fn discover(&self, path: &Path) -> Vec<DiscoveredFile> {
        if path.is_file() {
            return match std::fs::metadata(path) {
                Ok(meta) => vec![DiscoveredFile {
                    path: path.to_path_buf(),
                    size: meta.len(),
                }],
                Err(e) => {
                    tracing::warn!("Cannot stat {:?}: {e}", path);
                    vec![]
                }
            };
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let entry_path = entry.path();
            if entry_path.is_file() && self.is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                    });
                }
            }
        }

        // Sort by path for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
