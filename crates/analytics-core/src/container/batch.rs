//! Batch execution

use super::ContainerState;
use crate::algorithm::Algorithm;
use crate::config::Environment;
use crate::cpu::CpuFeatureLevel;
use crate::dispatch::{BoundKernel, Dispatcher};
use crate::error::Result;
use crate::kernels::BatchKernel;
use crate::status::{ErrorPolicy, Status};
use std::fmt;
use tracing::{instrument, trace};
use uuid::Uuid;

/// Runs an algorithm once over a complete dataset
pub struct BatchContainer<A: Algorithm> {
    id: Uuid,
    policy: ErrorPolicy,
    method: A::Method,
    parameter: A::Parameter,
    kernel: BoundKernel<dyn BatchKernel<A>>,
    result: Option<A::Model>,
    state: ContainerState,
}

impl<A: Algorithm> BatchContainer<A> {
    /// Bind the best batch kernel for `method` under `env`
    pub fn new(env: &Environment, method: A::Method, parameter: A::Parameter) -> Result<Self> {
        let kernel = Dispatcher::new(A::kernel_table(), env).bind::<dyn BatchKernel<A>>(method)?;
        Ok(Self {
            id: Uuid::new_v4(),
            policy: env.error_policy(),
            method,
            parameter,
            kernel,
            result: None,
            state: ContainerState::Ready,
        })
    }

    /// Train from scratch on `input`
    ///
    /// Any previous model is discarded first, so a failed call leaves no
    /// model behind.
    #[instrument(skip_all, fields(algorithm = A::NAME, id = %self.id, level = %self.kernel.level()))]
    pub fn compute(&mut self, input: &A::Input<'_>) -> Result<Status> {
        self.result = None;
        self.state = ContainerState::Ready;

        let mut status = Status::new(self.policy);
        if let Some(model) = status.check(self.kernel.compute(input, &self.parameter))? {
            trace!("batch compute finished");
            self.result = Some(model);
            self.state = ContainerState::Done;
        }
        Ok(status)
    }

    pub fn result(&self) -> Option<&A::Model> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<A::Model> {
        self.state = ContainerState::Ready;
        self.result.take()
    }

    pub fn parameter(&self) -> &A::Parameter {
        &self.parameter
    }

    /// Parameters used by the next `compute`
    pub fn parameter_mut(&mut self) -> &mut A::Parameter {
        &mut self.parameter
    }

    pub fn method(&self) -> A::Method {
        self.method
    }

    pub fn kernel(&self) -> &BoundKernel<dyn BatchKernel<A>> {
        &self.kernel
    }

    /// CPU level of the bound kernel
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

impl<A: Algorithm> Clone for BatchContainer<A> {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            policy: self.policy,
            method: self.method,
            parameter: self.parameter.clone(),
            kernel: self.kernel.clone(),
            result: self.result.clone(),
            state: self.state,
        }
    }
}

impl<A: Algorithm> fmt::Debug for BatchContainer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchContainer")
            .field("algorithm", &A::NAME)
            .field("id", &self.id)
            .field("method", &self.method)
            .field("kernel", &self.kernel)
            .field("state", &self.state)
            .finish()
    }
}
