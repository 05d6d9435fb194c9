//! Dispatcher interface.

use super::ActuationPlan;
use crate::error::Result;

/// Executes actuation plans on a backend.
///
/// Dispatch is synchronous: it returns once every command in the plan has
/// run to completion. Hardware failures surface as `Error::Actuation` and
/// are not retried.
pub trait ActuationDispatcher {
    /// Execute one plan.
    ///
    /// # Errors
    ///
    /// Returns `ActuationError` when the plan does not fit the backend or a
    /// pin/channel operation fails.
    fn dispatch(&mut self, plan: &ActuationPlan) -> Result<()>;
}

impl<T: ActuationDispatcher + ?Sized> ActuationDispatcher for &mut T {
    fn dispatch(&mut self, plan: &ActuationPlan) -> Result<()> {
        (**self).dispatch(plan)
    }
}
