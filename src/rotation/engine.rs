use std::io;

use crate::foundation::error::{StartupMovieError, StartupMovieResult};
use crate::foundation::level::LevelId;
use crate::layout::config::MovieLayout;
use crate::rotation::plan::{RotationCase, RotationPlan, RotationStep, plan_rotation};
use crate::slots::fs::SlotFs;
use crate::slots::probe::{Slot, SlotProbe};

/// Result of a rotation that ran to completion.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RotationReport {
    /// Level whose movie was assumed to occupy Active.
    pub leaving: LevelId,
    /// Level whose movie (or the default movie) now occupies Active.
    pub loading: LevelId,
    /// Branch of the state machine that was taken.
    pub case: RotationCase,
    /// Steps applied, in order.
    pub applied: Vec<RotationStep>,
}

/// Moves movies between slots so Active holds the right one for the loading level.
#[derive(Debug)]
pub struct RotationEngine<'a, F: SlotFs> {
    layout: &'a MovieLayout,
    fs: &'a F,
}

impl<'a, F: SlotFs> RotationEngine<'a, F> {
    /// Engine over the slots of `layout`, mutating through `fs`.
    pub fn new(layout: &'a MovieLayout, fs: &'a F) -> Self {
        Self { layout, fs }
    }

    /// Probe the slots and decide the steps, without mutating anything.
    pub fn plan(&self, leaving: &LevelId, loading: &LevelId) -> StartupMovieResult<RotationPlan> {
        plan_rotation(&SlotProbe::new(self.layout, self.fs), leaving, loading)
    }

    /// Plan and execute a `leaving -> loading` rotation.
    #[tracing::instrument(skip_all, fields(%leaving, %loading))]
    pub fn rotate(
        &self,
        leaving: &LevelId,
        loading: &LevelId,
    ) -> StartupMovieResult<RotationReport> {
        let plan = self.plan(leaving, loading)?;
        self.execute(plan)
    }

    /// Apply the steps of `plan` in order, stopping at the first failure.
    ///
    /// On failure the error carries the failing step and how many steps were applied before
    /// it; no later step is attempted.
    pub fn execute(&self, plan: RotationPlan) -> StartupMovieResult<RotationReport> {
        tracing::debug!(case = ?plan.case, steps = plan.steps.len(), "rotation planned");

        for (i, step) in plan.steps.iter().enumerate() {
            self.apply(step)
                .map_err(|source| StartupMovieError::Rotation {
                    step: i + 1,
                    applied: i,
                    action: step.to_string(),
                    source,
                })?;
            tracing::info!(step = i + 1, action = %step, "rotation step applied");
        }

        match plan.case {
            RotationCase::InstallOverStray | RotationCase::DiscardStrayDefault => {
                tracing::warn!(
                    leaving = %plan.leaving,
                    "discarded stray default movie; leaving level movie was already parked"
                );
            }
            RotationCase::RefillEmptyActive if plan.steps.is_empty() => {
                tracing::warn!("active slot is empty and no movie is available to fill it");
            }
            _ => {}
        }

        Ok(RotationReport {
            leaving: plan.leaving,
            loading: plan.loading,
            case: plan.case,
            applied: plan.steps,
        })
    }

    fn apply(&self, step: &RotationStep) -> io::Result<()> {
        let active = Slot::Active.path(self.layout);
        match step {
            RotationStep::Park { to } => {
                let dest = to.path(self.layout);
                if self.fs.exists(&dest) {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("park destination '{}' is occupied", dest.display()),
                    ));
                }
                self.fs.rename(&active, &dest)
            }
            RotationStep::Install { from } => self.fs.rename(&from.path(self.layout), &active),
            RotationStep::Discard { slot } => self.fs.remove_file(&slot.path(self.layout)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rotation/engine.rs"]
mod tests;
