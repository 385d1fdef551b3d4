use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{StartupMovieError, StartupMovieResult};
use crate::foundation::level::LevelId;

/// Where the three movie slots and the state file live.
///
/// Every field has a default matching a stock UDK install, so a JSON config only needs to
/// name the fields it overrides.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovieLayout {
    /// Directory holding every slot file and the state file.
    pub movies_dir: PathBuf,
    /// File name of the Active slot, the only file the host opens.
    pub active_file: String,
    /// Prefix of level slot file names. On its own it is also the Default slot's file name.
    pub level_prefix: String,
    /// Extension appended to level slot names, including the leading dot.
    pub extension: String,
    /// File name of the persisted transition state.
    pub state_file: String,
    /// File name of the record naming the level whose movie sat in Active when the current
    /// transition started. It only exists while a rotation is unfinished.
    pub pending_file: String,
}

impl Default for MovieLayout {
    fn default() -> Self {
        Self::udk_default()
    }
}

impl MovieLayout {
    /// Layout of a stock UDK install, relative to the host's working directory.
    pub fn udk_default() -> Self {
        Self {
            movies_dir: ["..", "..", "..", "UDKGame", "Movies"].iter().collect(),
            active_file: "UDKFrontEnd.udk_loading.bik".to_string(),
            level_prefix: "LoadingScreen_".to_string(),
            extension: ".bik".to_string(),
            state_file: "LastLoaded.txt".to_string(),
            pending_file: "LastLoaded.pending".to_string(),
        }
    }

    /// Stock file names rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            movies_dir: dir.into(),
            ..Self::udk_default()
        }
    }

    /// Parse a layout from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> StartupMovieResult<Self> {
        let layout: Self = serde_json::from_reader(r)
            .map_err(|e| StartupMovieError::config(format!("parse layout JSON: {e}")))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Parse a layout from a JSON file on disk and validate it.
    pub fn from_path(path: impl AsRef<Path>) -> StartupMovieResult<Self> {
        use anyhow::Context as _;

        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open layout config '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check that the file names are usable and do not alias each other.
    pub fn validate(&self) -> StartupMovieResult<()> {
        let names = [
            ("active_file", &self.active_file),
            ("level_prefix", &self.level_prefix),
            ("state_file", &self.state_file),
            ("pending_file", &self.pending_file),
        ];
        for (field, value) in names {
            if value.is_empty() {
                return Err(StartupMovieError::validation(format!(
                    "layout {field} must be non-empty"
                )));
            }
            if value.contains(['/', '\\', '\0']) {
                return Err(StartupMovieError::validation(format!(
                    "layout {field} {value:?} must be a bare file name"
                )));
            }
        }
        if self.extension.contains(['/', '\\', '\0']) {
            return Err(StartupMovieError::validation(format!(
                "layout extension {:?} must not contain path separators",
                self.extension
            )));
        }
        for (i, (field, value)) in names.iter().enumerate() {
            if let Some((other, _)) = names[i + 1..].iter().find(|(_, v)| v == value) {
                return Err(StartupMovieError::validation(format!(
                    "layout {field} and {other} must be distinct"
                )));
            }
        }
        Ok(())
    }

    /// Path of the Active slot.
    pub fn active_path(&self) -> PathBuf {
        self.movies_dir.join(&self.active_file)
    }

    /// Path of the Default slot: the bare level prefix, no extension.
    pub fn default_path(&self) -> PathBuf {
        self.movies_dir.join(&self.level_prefix)
    }

    /// Path of the level slot for `id`: `prefix + id + extension`.
    pub fn level_path(&self, id: &LevelId) -> PathBuf {
        let len = self.level_prefix.len() + id.as_str().len() + self.extension.len();
        let mut name = String::with_capacity(len);
        name.push_str(&self.level_prefix);
        name.push_str(id.as_str());
        name.push_str(&self.extension);
        self.movies_dir.join(name)
    }

    /// Path of the persisted transition state.
    pub fn state_path(&self) -> PathBuf {
        self.movies_dir.join(&self.state_file)
    }

    /// Path of the pending-transition record.
    pub fn pending_path(&self) -> PathBuf {
        self.movies_dir.join(&self.pending_file)
    }

    /// Recover the level identifier from a level slot file name, if it is one.
    pub fn level_from_file_name(&self, file_name: &str) -> Option<LevelId> {
        let id = file_name
            .strip_prefix(self.level_prefix.as_str())?
            .strip_suffix(self.extension.as_str())?;
        LevelId::new(id).ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/config.rs"]
mod tests;
