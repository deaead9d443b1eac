//! Distributed master step
//!
//! Workers run online containers over their shard and ship their partial
//! results to the master (transport is up to the caller). The master pushes
//! them into a [`PartialModels`] collection and calls
//! [`DistributedContainer::compute`], which merges the whole round into its
//! own partial result and empties the collection.

use super::ContainerState;
use crate::algorithm::{Algorithm, PartialResult};
use crate::config::Environment;
use crate::cpu::CpuFeatureLevel;
use crate::dispatch::{BoundKernel, Dispatcher};
use crate::error::{Error, Result};
use crate::kernels::DistributedKernel;
use crate::status::{ErrorPolicy, Status};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Partial results gathered from workers for one aggregation round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialModels<P> {
    items: Vec<P>,
}

impl<P> PartialModels<P> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, partial: P) {
        self.items.push(partial);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<P> Default for PartialModels<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> From<Vec<P>> for PartialModels<P> {
    fn from(items: Vec<P>) -> Self {
        Self { items }
    }
}

impl<P> FromIterator<P> for PartialModels<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<P> Extend<P> for PartialModels<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, P> IntoIterator for &'a PartialModels<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Master-side aggregation of worker partial results
pub struct DistributedContainer<A: Algorithm> {
    id: Uuid,
    policy: ErrorPolicy,
    method: A::Method,
    parameter: A::Parameter,
    kernel: BoundKernel<dyn DistributedKernel<A>>,
    partial: A::PartialResult,
    result: Option<A::Model>,
    state: ContainerState,
}

impl<A: Algorithm> DistributedContainer<A> {
    pub fn new(env: &Environment, method: A::Method, parameter: A::Parameter) -> Result<Self> {
        let kernel =
            Dispatcher::new(A::kernel_table(), env).bind::<dyn DistributedKernel<A>>(method)?;
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

    /// Merge every partial result in `collection` and empty it
    ///
    /// An empty collection is reported as `EmptyInput` and leaves the master
    /// partial result untouched. The collection is cleared whether or not the
    /// merge succeeds.
    #[instrument(skip_all, fields(algorithm = A::NAME, id = %self.id, n_partials = collection.len()))]
    pub fn compute(&mut self, collection: &mut PartialModels<A::PartialResult>) -> Result<Status> {
        let mut status = Status::new(self.policy);
        if collection.is_empty() {
            status.add(Error::EmptyInput(
                "partial model collection has no elements".to_string(),
            ))?;
            return Ok(status);
        }

        let outcome = collection.iter().try_for_each(|p| p.validate()).and_then(|()| {
            let locals: Vec<&A::PartialResult> = collection.iter().collect();
            self.kernel.aggregate(&locals, &mut self.partial, &self.parameter)
        });
        let merged = collection.len();
        collection.clear();

        if status.check(outcome)?.is_some() {
            debug!(merged, "aggregated partial results");
            self.state = ContainerState::Accumulating;
        }
        Ok(status)
    }

    /// Produce the model from the aggregated partial result
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

    pub fn take_partial_result(&mut self) -> A::PartialResult {
        self.state = ContainerState::Ready;
        std::mem::take(&mut self.partial)
    }

    /// Replace the master state; a malformed partial result is rejected
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

    /// Start a new round: drop the aggregated state and the last model
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

    pub fn kernel(&self) -> &BoundKernel<dyn DistributedKernel<A>> {
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

impl<A: Algorithm> Clone for DistributedContainer<A> {
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

impl<A: Algorithm> fmt::Debug for DistributedContainer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistributedContainer")
            .field("algorithm", &A::NAME)
            .field("id", &self.id)
            .field("method", &self.method)
            .field("kernel", &self.kernel)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_models_collection() {
        let mut c: PartialModels<u32> = (1..=3).collect();
        assert_eq!(c.len(), 3);
        c.push(4);
        c.extend([5, 6]);
        assert_eq!(c.iter().copied().sum::<u32>(), 21);
        c.clear();
        assert!(c.is_empty());

        let c = PartialModels::from(vec!["a", "b"]);
        let json = serde_json::to_string(&c).unwrap();
        let back: PartialModels<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
    }
}
