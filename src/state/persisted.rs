use std::path::{Path, PathBuf};

use crate::foundation::error::{StartupMovieError, StartupMovieResult};
use crate::foundation::level::LevelId;
use crate::layout::config::MovieLayout;
use crate::slots::fs::SlotFs;

/// Sidecar record of the level last known to own the Active slot.
///
/// It outlives the host process, so an interrupted rotation can be interpreted by the next
/// call. The file holds the identifier bytes and nothing else.
///
/// A second record, the pending file, names the level whose movie sat in Active when the
/// current transition started. It is written before the state file changes and removed once
/// the rotation completes, so a rotation cut short can be finished from the right level.
#[derive(Debug)]
pub struct PersistedState<'a, F: SlotFs> {
    path: PathBuf,
    pending_path: PathBuf,
    fs: &'a F,
}

impl<'a, F: SlotFs> PersistedState<'a, F> {
    /// State and pending files of `layout`, accessed through `fs`.
    pub fn new(layout: &MovieLayout, fs: &'a F) -> Self {
        Self {
            path: layout.state_path(),
            pending_path: layout.pending_path(),
            fs,
        }
    }

    /// Path of the sidecar file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the pending-transition record.
    pub fn pending_path(&self) -> &Path {
        &self.pending_path
    }

    /// Read the recorded identifier.
    ///
    /// Absent, unreadable, empty or malformed files all mean "no prior state".
    pub fn load(&self) -> Option<LevelId> {
        self.read_level(&self.path)
    }

    /// Read the level recorded as leaving by an unfinished transition.
    pub fn load_pending(&self) -> Option<LevelId> {
        self.read_level(&self.pending_path)
    }

    /// Confirm the sidecar can be written, without changing its content.
    pub fn probe_writable(&self) -> StartupMovieResult<()> {
        self.fs
            .open_for_write(&self.path)
            .map_err(|source| StartupMovieError::StateNotWritable {
                path: self.path.clone(),
                source,
            })
    }

    /// Replace the recorded identifier with `id`.
    pub fn store(&self, id: &LevelId) -> StartupMovieResult<()> {
        self.fs
            .write(&self.path, id.as_bytes())
            .map_err(|e| StartupMovieError::state("write", &self.path, e))?;
        tracing::debug!(path = %self.path.display(), level = %id, "persisted state updated");
        Ok(())
    }

    /// Record `leaving` as the owner of Active for the transition about to start.
    pub fn store_pending(&self, leaving: &LevelId) -> StartupMovieResult<()> {
        self.fs
            .write(&self.pending_path, leaving.as_bytes())
            .map_err(|e| StartupMovieError::state("write", &self.pending_path, e))?;
        tracing::debug!(
            path = %self.pending_path.display(),
            level = %leaving,
            "pending transition recorded"
        );
        Ok(())
    }

    /// Drop the pending record.
    ///
    /// A record left behind is recognized as stale by the next transition, so a failed
    /// delete is only logged.
    pub fn clear_pending(&self) {
        if !self.fs.exists(&self.pending_path) {
            return;
        }
        if let Err(e) = self.fs.remove_file(&self.pending_path) {
            tracing::warn!(
                path = %self.pending_path.display(),
                error = %e,
                "failed to remove pending transition record"
            );
        }
    }

    fn read_level(&self, path: &Path) -> Option<LevelId> {
        if !self.fs.exists(path) {
            tracing::debug!(path = %path.display(), "no persisted record");
            return None;
        }

        let bytes = match self.fs.read(path) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "persisted record unreadable");
                return None;
            }
        };

        let Ok(text) = std::str::from_utf8(&bytes) else {
            tracing::warn!(path = %path.display(), "persisted record is not UTF-8");
            return None;
        };

        match LevelId::new(text.trim_end_matches(['\r', '\n'])) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "persisted record ignored");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/persisted.rs"]
mod tests;
