use std::path::PathBuf;

use crate::foundation::error::StartupMovieResult;
use crate::foundation::level::LevelId;
use crate::layout::config::MovieLayout;
use crate::slots::fs::SlotFs;

/// Role a movie file plays.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Slot {
    /// The fixed path the host reads its loading movie from.
    Active,
    /// Parking place and presence marker for the generic movie.
    Default,
    /// Parking place of one level's movie.
    Level(LevelId),
}

impl Slot {
    /// Resolve this slot to a path under `layout`.
    pub fn path(&self, layout: &MovieLayout) -> PathBuf {
        match self {
            Self::Active => layout.active_path(),
            Self::Default => layout.default_path(),
            Self::Level(id) => layout.level_path(id),
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Default => f.write_str("Default"),
            Self::Level(id) => write!(f, "Level({id})"),
        }
    }
}

/// Read-only existence checks against the slots of one layout.
#[derive(Clone, Copy, Debug)]
pub struct SlotProbe<'a, F: SlotFs> {
    layout: &'a MovieLayout,
    fs: &'a F,
}

impl<'a, F: SlotFs> SlotProbe<'a, F> {
    /// Probe the slots of `layout` through `fs`.
    pub fn new(layout: &'a MovieLayout, fs: &'a F) -> Self {
        Self { layout, fs }
    }

    /// Layout being probed.
    pub fn layout(&self) -> &'a MovieLayout {
        self.layout
    }

    /// Whether `slot` is currently occupied.
    pub fn exists(&self, slot: &Slot) -> bool {
        let path = slot.path(self.layout);
        let present = self.fs.exists(&path);
        tracing::debug!(%slot, path = %path.display(), present, "probe");
        present
    }

    /// Occupancy of every slot in the movies directory.
    pub fn snapshot(&self) -> StartupMovieResult<SlotSnapshot> {
        use anyhow::Context as _;

        let dir = &self.layout.movies_dir;
        let names = self
            .fs
            .list_dir(dir)
            .with_context(|| format!("list movies directory '{}'", dir.display()))?;

        let mut levels: Vec<LevelId> = names
            .iter()
            .filter_map(|n| n.to_str())
            .filter_map(|n| self.layout.level_from_file_name(n))
            .collect();
        levels.sort();

        Ok(SlotSnapshot {
            active: self.exists(&Slot::Active),
            default: self.exists(&Slot::Default),
            levels,
        })
    }
}

/// Point-in-time view of slot occupancy.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlotSnapshot {
    /// Whether the Active slot holds a file.
    pub active: bool,
    /// Whether the Default slot holds a file.
    pub default: bool,
    /// Levels whose slot currently holds a parked movie, sorted.
    pub levels: Vec<LevelId>,
}

impl SlotSnapshot {
    /// Whether the generic movie is the one installed in Active.
    ///
    /// The Default slot is empty exactly when its movie sits in Active.
    pub fn active_holds_default(&self) -> bool {
        self.active && !self.default
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slots/probe.rs"]
mod tests;
