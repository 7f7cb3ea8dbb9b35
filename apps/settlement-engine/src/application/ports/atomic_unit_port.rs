//! Atomic Unit Port (Driven Port)
//!
//! All-or-nothing scope over every collaborator's state.

use serde::{Deserialize, Serialize};

/// Handle to a state checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checkpoint(pub u64);

/// Atomic unit error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtomicUnitError {
    /// Checkpoint not open.
    #[error("unknown checkpoint {0}")]
    UnknownCheckpoint(u64),

    /// Checkpoint is not the innermost open one.
    #[error("checkpoint {0} is not innermost")]
    OutOfOrder(u64),

    /// State unavailable.
    #[error("atomic unit unavailable: {message}")]
    Unavailable { message: String },
}

/// Port for opening, committing and reverting atomic units.
///
/// Checkpoints nest; only the innermost one may be committed or reverted.
pub trait AtomicUnitPort: Send + Sync {
    /// Open a checkpoint.
    fn begin(&self) -> Result<Checkpoint, AtomicUnitError>;

    /// Keep every change since `checkpoint`.
    fn commit(&self, checkpoint: Checkpoint) -> Result<(), AtomicUnitError>;

    /// Discard every change since `checkpoint`.
    fn revert(&self, checkpoint: Checkpoint) -> Result<(), AtomicUnitError>;

    /// Run `f` in a checkpoint: commit on `Ok`, revert on `Err`.
    fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce() -> Result<T, E>,
        E: From<AtomicUnitError>,
    {
        let checkpoint = self.begin()?;
        match f() {
            Ok(value) => {
                self.commit(checkpoint)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(revert_err) = self.revert(checkpoint) {
                    tracing::error!(error = %revert_err, "Failed to revert atomic unit");
                }
                Err(err)
            }
        }
    }
}
