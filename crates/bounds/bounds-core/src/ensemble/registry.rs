//! Ordered registration arena.

use std::fmt;

use bounds_spi::BoundTable;
use serde::{Deserialize, Serialize};

use super::method::FittedMethod;

/// Stable handle to a registration; its position in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(usize);

impl RegistrationId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A registered method and its table for the current metric.
///
/// `bounds` is `None` after a replay that failed for this method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    id: RegistrationId,
    method: FittedMethod,
    bounds: Option<BoundTable>,
}

impl Registration {
    pub(crate) fn new(id: RegistrationId, method: FittedMethod, bounds: BoundTable) -> Self {
        Self {
            id,
            method,
            bounds: Some(bounds),
        }
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    pub fn method(&self) -> &FittedMethod {
        &self.method
    }

    pub fn bounds(&self) -> Option<&BoundTable> {
        self.bounds.as_ref()
    }

    pub(crate) fn method_mut(&mut self) -> &mut FittedMethod {
        &mut self.method
    }

    pub(crate) fn set_bounds(&mut self, bounds: Option<BoundTable>) {
        self.bounds = bounds;
    }
}
