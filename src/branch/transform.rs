use std::fmt::Display;

use crate::domain::BranchFailure;

/// Payload rejected by [`RejectSentinel::default`]
pub const DEFAULT_SENTINEL: &str = "nope";

/// Single-input, single-output stage run by one branch
///
/// `process` is called once per payload, in arrival order for its branch.
/// A failure does not end the branch; it keeps receiving input until the
/// coordinator finalizes it.
pub trait BranchTransform<T>: Send + 'static {
    type Output: Send + 'static;

    fn process(&mut self, payload: T) -> Result<Self::Output, BranchFailure>;
}

impl<T, O, F> BranchTransform<T> for F
where
    F: FnMut(T) -> Result<O, BranchFailure> + Send + 'static,
    O: Send + 'static,
{
    type Output = O;

    fn process(&mut self, payload: T) -> Result<O, BranchFailure> {
        self(payload)
    }
}

/// Passes every payload through unchanged except the sentinel, which is
/// rejected as `invalid.payload`
#[derive(Debug, Clone)]
pub struct RejectSentinel<T> {
    sentinel: T,
}

impl<T> RejectSentinel<T> {
    pub fn new(sentinel: T) -> Self {
        Self { sentinel }
    }

    pub fn sentinel(&self) -> &T {
        &self.sentinel
    }
}

impl Default for RejectSentinel<String> {
    fn default() -> Self {
        Self::new(DEFAULT_SENTINEL.to_string())
    }
}

impl<T> BranchTransform<T> for RejectSentinel<T>
where
    T: PartialEq + Display + Send + 'static,
{
    type Output = T;

    fn process(&mut self, payload: T) -> Result<T, BranchFailure> {
        if payload == self.sentinel {
            return Err(BranchFailure::invalid_payload(&payload));
        }
        Ok(payload)
    }
}
