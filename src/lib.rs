//! Loading-screen movie selection for UDK hosts.
//!
//! The host engine always plays one fixed file, the *Active* slot. Before each level loads,
//! this crate rearranges files in the movies directory so that the Active slot holds the
//! loading movie for the level about to load: that level's own movie when one is parked as
//! `LoadingScreen_<level>.bik`, otherwise the generic movie parked in the *Default* slot.
//!
//! # Transition overview
//!
//! 1. **Compare**: identical leaving/loading names are a no-op.
//! 2. **Recall**: the persisted state (`LastLoaded.txt`) names the level whose movie really
//!    sits in Active and overrides the host's leaving level.
//! 3. **Record**: the loading level is persisted before any movie moves.
//! 4. **Rotate**: at most three renames/deletes, planned from slot existence alone.
//!
//! Design constraints:
//!
//! - **Renames only**: movies are never copied or opened.
//! - **Fail fast**: the first failed rename or delete stops the rotation and is reported.
//! - **Fail safe**: if the state file cannot be written on first run, nothing moves.
//! - **`unsafe` only at the C ABI**: confined to [`ffi`].
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod layout;
mod rotation;
mod slots;
mod state;
mod transition;

pub mod ffi;

pub use foundation::error::{StartupMovieError, StartupMovieResult};
pub use foundation::level::{LevelId, MAX_LEVEL_ID_BYTES};
pub use layout::config::MovieLayout;
pub use rotation::engine::{RotationEngine, RotationReport};
pub use rotation::plan::{RotationCase, RotationPlan, RotationStep, plan_rotation};
pub use slots::fs::{DiskFs, SlotFs};
pub use slots::probe::{Slot, SlotProbe, SlotSnapshot};
pub use state::persisted::PersistedState;
pub use transition::{MovieSwitcher, TransitionOutcome, UnchangedReason};
