use crate::foundation::error::StartupMovieResult;
use crate::foundation::level::LevelId;
use crate::layout::config::MovieLayout;
use crate::rotation::engine::{RotationEngine, RotationReport};
use crate::slots::fs::{DiskFs, SlotFs};
use crate::slots::probe::{Slot, SlotProbe, SlotSnapshot};
use crate::state::persisted::PersistedState;

/// Why a transition left every file where it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum UnchangedReason {
    /// The host asked to move from a level to itself.
    SameLevel,
    /// The persisted state already records the loading level and no unfinished rotation
    /// toward it could be resumed.
    AlreadyActive,
}

/// What a transition did.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TransitionOutcome {
    /// Nothing was touched, not even the state file.
    Unchanged(UnchangedReason),
    /// The state file was updated and the rotation ran to completion.
    Rotated {
        /// Steps taken by the rotation engine (possibly none).
        report: RotationReport,
        /// Whether this call finished a transition recorded by an earlier, interrupted call.
        resumed: bool,
    },
}

impl TransitionOutcome {
    /// Number of slot files renamed or deleted.
    pub fn mutations(&self) -> usize {
        match self {
            Self::Unchanged(_) => 0,
            Self::Rotated { report, .. } => report.applied.len(),
        }
    }
}

/// Entry point for level transitions: keeps the persisted state and the slots in step.
#[derive(Debug)]
pub struct MovieSwitcher<F: SlotFs = DiskFs> {
    layout: MovieLayout,
    fs: F,
}

impl MovieSwitcher<DiskFs> {
    /// Switcher operating directly on disk.
    pub fn on_disk(layout: MovieLayout) -> Self {
        Self::new(layout, DiskFs)
    }
}

impl<F: SlotFs> MovieSwitcher<F> {
    /// Switcher over `layout`, performing all file access through `fs`.
    pub fn new(layout: MovieLayout, fs: F) -> Self {
        Self { layout, fs }
    }

    /// Layout this switcher manages.
    pub fn layout(&self) -> &MovieLayout {
        &self.layout
    }

    /// Identifier currently recorded in the state file, if any.
    pub fn persisted_level(&self) -> Option<LevelId> {
        PersistedState::new(&self.layout, &self.fs).load()
    }

    /// Occupancy of every slot.
    pub fn snapshot(&self) -> StartupMovieResult<SlotSnapshot> {
        SlotProbe::new(&self.layout, &self.fs).snapshot()
    }

    /// Handle a transition named by narrow text.
    ///
    /// Identical raw names short-circuit before any validation or filesystem access. The
    /// leaving name is only validated when no persisted state overrides it.
    pub fn set_startup_movie(
        &self,
        leaving: &str,
        loading: &str,
    ) -> StartupMovieResult<TransitionOutcome> {
        if leaving == loading {
            return Ok(TransitionOutcome::Unchanged(UnchangedReason::SameLevel));
        }
        self.run(&LevelId::new(loading)?, || LevelId::new(leaving))
    }

    /// Handle a transition named by host wide text (UTF-16, no terminator).
    pub fn set_startup_movie_wide(
        &self,
        leaving: &[u16],
        loading: &[u16],
    ) -> StartupMovieResult<TransitionOutcome> {
        if leaving == loading {
            return Ok(TransitionOutcome::Unchanged(UnchangedReason::SameLevel));
        }
        self.run(&LevelId::from_wide(loading)?, || LevelId::from_wide(leaving))
    }

    /// Handle a `leaving -> loading` transition.
    ///
    /// The persisted state, when readable, overrides `leaving`. The loading level is recorded
    /// before any movie moves, together with a pending record naming the level that owned
    /// Active. A rotation cut short is finished by the next call from that recorded level. If
    /// the rotation fails before its first step, the previous level is written back.
    pub fn transition(
        &self,
        leaving: &LevelId,
        loading: &LevelId,
    ) -> StartupMovieResult<TransitionOutcome> {
        if leaving == loading {
            return Ok(TransitionOutcome::Unchanged(UnchangedReason::SameLevel));
        }
        self.run(loading, || Ok(leaving.clone()))
    }

    #[tracing::instrument(skip_all, fields(%loading))]
    fn run(
        &self,
        loading: &LevelId,
        host_leaving: impl FnOnce() -> StartupMovieResult<LevelId>,
    ) -> StartupMovieResult<TransitionOutcome> {
        let state = PersistedState::new(&self.layout, &self.fs);
        let probe = SlotProbe::new(&self.layout, &self.fs);
        let engine = RotationEngine::new(&self.layout, &self.fs);

        let prior = state.load();
        let resumed = match (&prior, state.load_pending()) {
            (Some(recorded), Some(pending))
                if &pending != recorded && interrupted(&probe, recorded) =>
            {
                tracing::warn!(
                    leaving = %pending,
                    loading = %recorded,
                    "resuming interrupted transition"
                );
                let report = engine.rotate(&pending, recorded)?;
                state.clear_pending();
                Some(report)
            }
            (_, Some(_)) => {
                state.clear_pending();
                None
            }
            (_, None) => None,
        };

        let effective_leaving = match prior {
            Some(recorded) if &recorded == loading => {
                if let Some(report) = resumed {
                    return Ok(TransitionOutcome::Rotated {
                        report,
                        resumed: true,
                    });
                }
                if interrupted(&probe, loading) {
                    // Without the pending record the level that owned Active is unknown.
                    tracing::warn!(
                        level = %loading,
                        "interrupted transition has no pending record; slots left as they are"
                    );
                }
                return Ok(TransitionOutcome::Unchanged(UnchangedReason::AlreadyActive));
            }
            Some(recorded) => {
                tracing::debug!(leaving = %recorded, "leaving level taken from persisted state");
                recorded
            }
            None => {
                let leaving = host_leaving()?;
                if &leaving == loading {
                    return Ok(TransitionOutcome::Unchanged(UnchangedReason::SameLevel));
                }
                state.probe_writable()?;
                leaving
            }
        };

        state.store_pending(&effective_leaving)?;
        state.store(loading)?;

        match engine.rotate(&effective_leaving, loading) {
            Ok(report) => {
                state.clear_pending();
                Ok(TransitionOutcome::Rotated {
                    report,
                    resumed: resumed.is_some(),
                })
            }
            Err(e) => {
                if e.applied_steps() == 0 {
                    if let Err(rollback) = state.store(&effective_leaving) {
                        tracing::error!(error = %rollback, "failed to restore persisted state");
                    } else {
                        state.clear_pending();
                    }
                }
                Err(e)
            }
        }
    }
}

// A level recorded as loaded whose movie is still parked, or an empty Active, means an
// earlier rotation stopped part way.
fn interrupted<F: SlotFs>(probe: &SlotProbe<'_, F>, recorded: &LevelId) -> bool {
    !probe.exists(&Slot::Active) || probe.exists(&Slot::Level(recorded.clone()))
}

#[cfg(test)]
#[path = "../tests/unit/transition.rs"]
mod tests;
