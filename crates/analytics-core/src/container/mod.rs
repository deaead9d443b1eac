//! Execution containers
//!
//! A container binds one kernel at construction and drives it for one
//! execution mode:
//!
//! - [`BatchContainer`]: one `compute` over the whole dataset
//! - [`OnlineContainer`]: repeated `compute` calls folding blocks into a
//!   partial result, then `finalize_compute`
//! - [`DistributedContainer`]: master step merging a [`PartialModels`]
//!   collection gathered from workers, then `finalize_compute`
//!
//! Every operation returns `Result<Status>`. Under [`ErrorPolicy::Raise`]
//! failures come back as `Err`; under [`ErrorPolicy::Accumulate`] they are
//! recorded in the returned status.
//!
//! [`ErrorPolicy::Raise`]: crate::status::ErrorPolicy::Raise
//! [`ErrorPolicy::Accumulate`]: crate::status::ErrorPolicy::Accumulate

mod batch;
mod distributed;
mod online;

pub use batch::BatchContainer;
pub use distributed::{DistributedContainer, PartialModels};
pub use online::OnlineContainer;

use std::fmt;

/// Lifecycle position of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerState {
    /// Constructed or reset; no data seen
    #[default]
    Ready,
    /// Partial result holds data that has not been finalized
    Accumulating,
    /// A model is available
    Done,
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerState::Ready => "ready",
            ContainerState::Accumulating => "accumulating",
            ContainerState::Done => "done",
        })
    }
}
