//! Online execution

use super::ContainerState;
use crate::algorithm::{Algorithm, PartialResult};
use crate::config::Environment;
use crate::cpu::CpuFeatureLevel;
use crate::dispatch::{BoundKernel, Dispatcher};
use crate::error::{Error, Result};
use crate::kernels::OnlineKernel;
use crate::status::{ErrorPolicy, Status};
use std::fmt;
use tracing::{instrument, trace};
use uuid::Uuid;

/// Folds data blocks into a partial result and finalizes on request
///
/// The partial result is never reset implicitly; call [`reset`] between
/// independent runs.
///
/// [`reset`]: OnlineContainer::reset
pub struct OnlineContainer<A: Algorithm> {
    id: Uuid,
    policy: ErrorPolicy,
    method: A::Method,
    parameter: A::Parameter,
    kernel: BoundKernel<dyn OnlineKernel<A>>,
    partial: A::PartialResult,
    result: Option<A::Model>,
    state: ContainerState,
}

impl<A: Algorithm> OnlineContainer<A> {
    pub fn new(env: &Environment, method: A::Method, parameter: A::Parameter) -> Result<Self> {
        let kernel = Dispatcher::new(A::kernel_table(), env).bind::<dyn OnlineKernel<A>>(method)?;
        Ok(Self {
            id: Uuid::new_v4(),
            policy: env.error_policy(),
            method,
            parameter,
            kernel,
            partial: A::PartialResult::default(),
            result: None,
            state: ContainerState::Ready,
        })
    }

    /// Fold one block of input into the partial result
    ///
    /// The last finalized model stays available until the next
    /// `finalize_compute`.
    #[instrument(skip_all, fields(algorithm = A::NAME, id = %self.id))]
    pub fn compute(&mut self, input: &A::Input<'_>) -> Result<Status> {
        let mut status = Status::new(self.policy);
        let outcome = self.kernel.compute(input, &mut self.partial, &self.parameter);
        if status.check(outcome)?.is_some() {
            trace!("block folded into partial result");
            self.state = ContainerState::Accumulating;
        }
        Ok(status)
    }

    /// Produce the model from everything accumulated so far
    ///
    /// The partial result is left as is, so more blocks may follow.
    #[instrument(skip_all, fields(algorithm = A::NAME, id = %self.id))]
    pub fn finalize_compute(&mut self) -> Result<Status> {
        let mut status = Status::new(self.policy);
        if self.partial.is_empty() {
            self.result = None;
            status.add(Error::EmptyPartialResult)?;
            return Ok(status);
        }

        self.result = None;
        self.state = ContainerState::Accumulating;
        if let Some(model) = status.check(self.kernel.finalize(&self.partial, &self.parameter))? {
            self.result = Some(model);
            self.state = ContainerState::Done;
        }
        Ok(status)
    }

    pub fn partial_result(&self) -> &A::PartialResult {
        &self.partial
    }

    /// Move the partial result out, leaving an empty one
    pub fn take_partial_result(&mut self) -> A::PartialResult {
        self.state = ContainerState::Ready;
        std::mem::take(&mut self.partial)
    }

    /// Resume from a previously saved partial result
    ///
    /// A malformed partial result is rejected and the container is left as is.
    pub fn set_partial_result(&mut self, partial: A::PartialResult) -> Result<()> {
        partial.validate()?;
        self.state = if partial.is_empty() {
            ContainerState::Ready
        } else {
            ContainerState::Accumulating
        };
        self.partial = partial;
        Ok(())
    }

    /// Drop accumulated data and the last model
    pub fn reset(&mut self) {
        self.partial.reset();
        self.result = None;
        self.state = ContainerState::Ready;
    }

    pub fn result(&self) -> Option<&A::Model> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<A::Model> {
        self.result.take()
    }

    pub fn parameter(&self) -> &A::Parameter {
        &self.parameter
    }

    pub fn parameter_mut(&mut self) -> &mut A::Parameter {
        &mut self.parameter
    }

    pub fn method(&self) -> A::Method {
        self.method
    }

    pub fn kernel(&self) -> &BoundKernel<dyn OnlineKernel<A>> {
        &self.kernel
    }

    pub fn level(&self) -> CpuFeatureLevel {
        self.kernel.level()
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<A: Algorithm> Clone for OnlineContainer<A> {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            policy: self.policy,
            method: self.method,
            parameter: self.parameter.clone(),
            kernel: self.kernel.clone(),
            partial: self.partial.clone(),
            result: self.result.clone(),
            state: self.state,
        }
    }
}

impl<A: Algorithm> fmt::Debug for OnlineContainer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnlineContainer")
            .field("algorithm", &A::NAME)
            .field("id", &self.id)
            .field("method", &self.method)
            .field("kernel", &self.kernel)
            .field("state", &self.state)
            .finish()
    }
}
