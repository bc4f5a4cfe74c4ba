//! File filtering logic for the scanner.

use std::collections::HashSet;
use std::path::Path;

/// Extensions the default decoders can read
const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"];

/// Filters files to determine if they are supported images
#[derive(Debug, Clone)]
pub struct ImageFilter {
    /// File extensions to include (lowercase)
    extensions: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ImageFilter {
    /// Create a new filter with default supported extensions
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the final path component starts with a dot
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_common_formats() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/renders/frame.png")));
        assert!(filter.should_include(Path::new("/renders/frame.JPEG")));
        assert!(filter.should_include(Path::new("/renders/frame.tif")));
    }

    #[test]
    fn filter_excludes_non_images() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/renders/notes.txt")));
        assert!(!filter.should_include(Path::new("/renders/clip.mp4")));
    }

    #[test]
    fn filter_excludes_hidden_by_default() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/renders/.thumb.png")));
        assert!(ImageFilter::new()
            .with_hidden(true)
            .should_include(Path::new("/renders/.thumb.png")));
    }

    #[test]
    fn custom_extensions_are_normalized() {
        let filter = ImageFilter::new().with_extensions(vec![".PNG".to_string()]);
        assert!(filter.should_include(Path::new("a.png")));
        assert!(!filter.should_include(Path::new("a.jpg")));
    }

    #[test]
    fn filter_handles_no_extension() {
        assert!(!ImageFilter::new().should_include(Path::new("/renders/no_extension")));
    }
}
