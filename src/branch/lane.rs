use tracing::debug;

use super::transform::BranchTransform;
use crate::domain::BranchFailure;

/// One parallel processing lane
///
/// Wraps a transform with its position in the branch set and the
/// finalize guard. Feeding a finalized branch is a caller bug.
pub struct Branch<X> {
    index: usize,
    transform: X,
    processed: u64,
    failed: u64,
    finalized: bool,
}

impl<X> Branch<X> {
    /// Create lane `index` around `transform`
    pub fn new(index: usize, transform: X) -> Self {
        Self {
            index,
            transform,
            processed: 0,
            failed: 0,
            finalized: false,
        }
    }

    /// Run one payload through the transform
    ///
    /// # Panics
    /// Panics if the branch has already been finalized.
    pub fn process<T>(
        &mut self,
        payload: T,
    ) -> Result<<X as BranchTransform<T>>::Output, BranchFailure>
    where
        X: BranchTransform<T>,
    {
        assert!(
            !self.finalized,
            "branch {} received input after finalize",
            self.index
        );

        self.processed += 1;
        let result = self.transform.process(payload);
        if result.is_err() {
            self.failed += 1;
        }
        result
    }

    /// Mark the lane as receiving no more input
    ///
    /// Returns false if it was already finalized.
    pub fn finalize(&mut self) -> bool {
        if self.finalized {
            return false;
        }

        debug!(
            branch = self.index,
            processed = self.processed,
            failed = self.failed,
            "Branch finalized"
        );
        self.finalized = true;
        true
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Payloads handed to the transform so far
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Payloads the transform rejected
    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}
