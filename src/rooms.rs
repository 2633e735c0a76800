//! Room files on disk
//!
//! Layout: `<base>/{easy,medium,hard,boss}/*.room`. Identifiers are the
//! file paths, so [`FsRooms`] can read them back directly.

use std::path::{Path, PathBuf};

use crate::sim::{RoomCategory, RoomError, RoomPools, RoomSource};

/// Collect `.room` files from the four category subdirectories.
///
/// Missing subdirectories are skipped with a warning. Files are sorted so
/// pools are stable across platforms.
pub fn scan_room_dir(base: &Path) -> RoomPools {
    let mut pools = RoomPools::new();

    for category in RoomCategory::ALL {
        let dir = base.join(category.as_str());
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Could not open room directory {}: {}", dir.display(), err);
                continue;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| is_room_file(path))
            .collect();
        files.sort();

        for file in files {
            log::debug!("Found {} room: {}", category.as_str(), file.display());
            pools.push(category, file.to_string_lossy().into_owned());
        }
    }

    pools
}

/// A `.room` file with a non-empty stem
fn is_room_file(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext == "room")
        && path.file_stem().is_some_and(|stem| !stem.is_empty())
}

/// Reads room text from the filesystem; identifiers are paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRooms;

impl RoomSource for FsRooms {
    fn room_text(&self, id: &str) -> Result<String, RoomError> {
        Ok(std::fs::read_to_string(id)?)
    }
}
