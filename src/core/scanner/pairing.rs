//! Turning two directory listings into index-paired path lists.

use super::DirectoryScanner;
use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// How files from the two directories are matched up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairBy {
    /// i-th file of A with i-th file of B, both sorted by path
    #[default]
    Index,
    /// Files with the same path relative to their directory
    Name,
}

/// Two equal-position path lists ready for a batch
#[derive(Debug, Default)]
pub struct DirectoryPairs {
    pub paths_a: Vec<PathBuf>,
    pub paths_b: Vec<PathBuf>,
    /// Files left without a partner (name pairing only)
    pub unmatched: Vec<PathBuf>,
    /// Non-fatal listing errors from either directory
    pub errors: Vec<ScanError>,
}

/// List both directories and pair their images.
///
/// With [`PairBy::Index`] the lists are returned as listed, so differing
/// counts surface later as a batch size mismatch.
pub fn pair_directories(
    scanner: &dyn DirectoryScanner,
    dir_a: &Path,
    dir_b: &Path,
    pair_by: PairBy,
    events: &EventSender,
) -> Result<DirectoryPairs, ScanError> {
    let listed_a = scanner.list_with_events(dir_a, events)?;
    let listed_b = scanner.list_with_events(dir_b, events)?;

    let mut errors = listed_a.errors;
    errors.extend(listed_b.errors);

    match pair_by {
        PairBy::Index => Ok(DirectoryPairs {
            paths_a: listed_a.images,
            paths_b: listed_b.images,
            unmatched: Vec::new(),
            errors,
        }),
        PairBy::Name => {
            let mut by_name_b: BTreeMap<PathBuf, PathBuf> = listed_b
                .images
                .into_iter()
                .map(|path| (relative_to(&path, dir_b), path))
                .collect();

            let mut pairs = DirectoryPairs {
                errors,
                ..Default::default()
            };

            for path_a in listed_a.images {
                match by_name_b.remove(&relative_to(&path_a, dir_a)) {
                    Some(path_b) => {
                        pairs.paths_a.push(path_a);
                        pairs.paths_b.push(path_b);
                    }
                    None => pairs.unmatched.push(path_a),
                }
            }
            pairs.unmatched.extend(by_name_b.into_values());

            if !pairs.unmatched.is_empty() {
                tracing::warn!(count = pairs.unmatched.len(), "files without a partner");
            }

            Ok(pairs)
        }
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
