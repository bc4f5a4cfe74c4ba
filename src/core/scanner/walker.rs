//! Directory listing implementation using walkdir.

use super::filter::{is_hidden, ImageFilter};
use super::{DirectoryScanner, ScanResult};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

/// Scanner implementation using the walkdir crate.
///
/// Entries come back sorted by path so two directories with the same
/// layout line up index by index.
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    fn skip_hidden_dir(&self, entry: &DirEntry) -> bool {
        !self.config.include_hidden
            && entry.depth() > 0
            && entry.file_type().is_dir()
            && is_hidden(entry.path())
    }
}

impl Default for WalkDirScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl DirectoryScanner for WalkDirScanner {
    fn list_with_events(&self, root: &Path, events: &EventSender) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            path: root.to_path_buf(),
        }));

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        let mut images = Vec::new();
        let mut errors = Vec::new();

        for entry_result in walker
            .into_iter()
            .filter_entry(|entry| !self.skip_hidden_dir(entry))
        {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() && !entry.path().is_file() {
                        continue;
                    }
                    if !self.filter.should_include(entry.path()) {
                        continue;
                    }

                    events.send(Event::Scan(ScanEvent::ImageFound {
                        path: entry.path().to_path_buf(),
                    }));
                    images.push(entry.into_path());
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    tracing::warn!(path = %path.display(), %error, "skipping unreadable entry");
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        // walkdir sorts siblings; a full path sort also orders across subdirectories
        images.sort();

        tracing::debug!(root = %root.display(), images = images.len(), "directory listed");
        events.send(Event::Scan(ScanEvent::Completed {
            path: root.to_path_buf(),
            total_images: images.len(),
        }));

        Ok(ScanResult { images, errors })
    }
}
