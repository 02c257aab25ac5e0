/// Default number of branches
pub const DEFAULT_BRANCHES: usize = 3;

/// Default per-branch queue capacity
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Fan-out sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of parallel branches (at least 1)
    pub branches: usize,

    /// Payloads that may wait in one branch's queue before `accept` waits
    pub queue_capacity: usize,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self {
            branches: DEFAULT_BRANCHES,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Set number of branches (clamped to at least 1)
    pub fn with_branches(mut self, num: usize) -> Self {
        self.branches = num.max(1);
        self
    }

    /// Set per-branch queue capacity (clamped to at least 1)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}
