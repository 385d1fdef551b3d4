use crate::foundation::error::{StartupMovieError, StartupMovieResult};
use crate::foundation::level::LevelId;
use crate::slots::fs::SlotFs;
use crate::slots::probe::{Slot, SlotProbe};

/// One filesystem mutation of a rotation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RotationStep {
    /// Move the movie in Active to an empty parking slot. Never overwrites.
    Park {
        /// Destination slot.
        to: Slot,
    },
    /// Move a parked movie into Active, replacing whatever Active holds.
    Install {
        /// Source slot.
        from: Slot,
    },
    /// Delete a redundant parked copy.
    Discard {
        /// Slot to delete.
        slot: Slot,
    },
}

impl std::fmt::Display for RotationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Park { to } => write!(f, "park Active -> {to}"),
            Self::Install { from } => write!(f, "install {from} -> Active"),
            Self::Discard { slot } => write!(f, "discard {slot}"),
        }
    }
}

/// Which branch of the rotation state machine a plan came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum RotationCase {
    /// Loading level has its own movie; Active held the default movie, which gets parked.
    InstallOverDefault,
    /// Loading level has its own movie; Active held the leaving level's movie, which gets parked.
    InstallOverLevel,
    /// Loading level has its own movie; Default was a stray copy of a level movie that is
    /// already parked, so Default is deleted and Active is overwritten.
    InstallOverStray,
    /// No movie for the loading level; the default movie already sits in Active.
    DefaultAlreadyActive,
    /// No movie for the loading level; the leaving level's movie is parked and the default
    /// movie restored.
    RestoreDefault,
    /// No movie for the loading level; Default was a stray copy and is deleted.
    DiscardStrayDefault,
    /// Active is empty (an earlier rotation parked its movie and stopped); the loading
    /// level's movie, or failing that the default movie, is installed without parking.
    RefillEmptyActive,
}

/// Ordered mutations that leave Active holding the right movie for `loading`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RotationPlan {
    /// Level whose movie is assumed to occupy Active.
    pub leaving: LevelId,
    /// Level about to load.
    pub loading: LevelId,
    /// Branch taken.
    pub case: RotationCase,
    /// Mutations in execution order, at most three.
    pub steps: Vec<RotationStep>,
}

impl RotationPlan {
    /// Whether executing the plan touches the filesystem at all.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Decide the mutations for a `leaving -> loading` transition from current slot occupancy.
///
/// Pure apart from existence probes; nothing is mutated.
pub fn plan_rotation<F: SlotFs>(
    probe: &SlotProbe<'_, F>,
    leaving: &LevelId,
    loading: &LevelId,
) -> StartupMovieResult<RotationPlan> {
    if leaving == loading {
        return Err(StartupMovieError::validation(format!(
            "rotation requires distinct levels (both are {loading:?})"
        )));
    }

    let target = Slot::Level(loading.clone());
    let parked_leaving = Slot::Level(leaving.clone());

    if !probe.exists(&Slot::Active) {
        let steps = if probe.exists(&target) {
            vec![RotationStep::Install { from: target }]
        } else if probe.exists(&Slot::Default) {
            vec![RotationStep::Install {
                from: Slot::Default,
            }]
        } else {
            Vec::new()
        };
        return Ok(RotationPlan {
            leaving: leaving.clone(),
            loading: loading.clone(),
            case: RotationCase::RefillEmptyActive,
            steps,
        });
    }

    let (case, steps) = if probe.exists(&target) {
        let (case, mut steps) = if !probe.exists(&Slot::Default) {
            (
                RotationCase::InstallOverDefault,
                vec![RotationStep::Park { to: Slot::Default }],
            )
        } else if probe.exists(&parked_leaving) {
            (
                RotationCase::InstallOverStray,
                vec![RotationStep::Discard {
                    slot: Slot::Default,
                }],
            )
        } else {
            (
                RotationCase::InstallOverLevel,
                vec![RotationStep::Park { to: parked_leaving }],
            )
        };
        steps.push(RotationStep::Install { from: target });
        (case, steps)
    } else if !probe.exists(&Slot::Default) {
        (RotationCase::DefaultAlreadyActive, Vec::new())
    } else if probe.exists(&parked_leaving) {
        (
            RotationCase::DiscardStrayDefault,
            vec![RotationStep::Discard {
                slot: Slot::Default,
            }],
        )
    } else {
        (
            RotationCase::RestoreDefault,
            vec![
                RotationStep::Park { to: parked_leaving },
                RotationStep::Install {
                    from: Slot::Default,
                },
            ],
        )
    };

    Ok(RotationPlan {
        leaving: leaving.clone(),
        loading: loading.clone(),
        case,
        steps,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/rotation/plan.rs"]
mod tests;
