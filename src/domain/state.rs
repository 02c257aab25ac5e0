use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a fan-out pipeline
///
/// ```text
/// Active --(branch failure)--> Erroring --> Finishing --> Finished
/// Active --(no more input)--------------> Finishing --> Finished
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PipelineState {
    Active = 0,
    Erroring = 1,
    Finishing = 2,
    Finished = 3,
}

impl PipelineState {
    /// Check whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::Erroring)
                | (Self::Active, Self::Finishing)
                | (Self::Erroring, Self::Finishing)
                | (Self::Finishing, Self::Finished)
        )
    }

    /// Whether upstream records are still accepted
    pub fn accepts_input(self) -> bool {
        self == Self::Active
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Finished
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Active,
            1 => Self::Erroring,
            2 => Self::Finishing,
            _ => Self::Finished,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Active => "active",
            Self::Erroring => "erroring",
            Self::Finishing => "finishing",
            Self::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Atomic holder for a [`PipelineState`] shared between the coordinator,
/// its branch workers and the supervisor task
#[derive(Debug)]
pub struct StateCell {
    raw: AtomicU8,
}

impl StateCell {
    /// Create a cell in the `Active` state
    pub fn new() -> Self {
        Self {
            raw: AtomicU8::new(PipelineState::Active as u8),
        }
    }

    /// Current state
    pub fn get(&self) -> PipelineState {
        PipelineState::from_u8(self.raw.load(Ordering::Acquire))
    }

    /// Move from `from` to `to` if the cell is still in `from` and the edge is legal
    ///
    /// Returns true if this call performed the transition.
    pub fn transition(&self, from: PipelineState, to: PipelineState) -> bool {
        if !from.can_transition_to(to) {
            return false;
        }

        self.raw
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_active() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), PipelineState::Active);
        assert!(cell.get().accepts_input());
    }

    #[test]
    fn error_path_reaches_finished() {
        let cell = StateCell::new();
        assert!(cell.transition(PipelineState::Active, PipelineState::Erroring));
        assert!(!cell.get().accepts_input());
        assert!(cell.transition(PipelineState::Erroring, PipelineState::Finishing));
        assert!(cell.transition(PipelineState::Finishing, PipelineState::Finished));
        assert!(cell.get().is_terminal());
    }

    #[test]
    fn success_path_skips_erroring() {
        let cell = StateCell::new();
        assert!(cell.transition(PipelineState::Active, PipelineState::Finishing));
        assert!(cell.transition(PipelineState::Finishing, PipelineState::Finished));
    }

    #[test]
    fn rejects_illegal_edges() {
        let cell = StateCell::new();
        assert!(!cell.transition(PipelineState::Active, PipelineState::Finished));
        assert!(!cell.transition(PipelineState::Erroring, PipelineState::Active));
        assert_eq!(cell.get(), PipelineState::Active);
    }

    #[test]
    fn no_transition_leaves_finished() {
        for next in [
            PipelineState::Active,
            PipelineState::Erroring,
            PipelineState::Finishing,
            PipelineState::Finished,
        ] {
            assert!(!PipelineState::Finished.can_transition_to(next));
        }
    }

    #[test]
    fn stale_source_state_is_rejected() {
        let cell = StateCell::new();
        assert!(cell.transition(PipelineState::Active, PipelineState::Finishing));
        // Someone else already left Active
        assert!(!cell.transition(PipelineState::Active, PipelineState::Erroring));
        assert_eq!(cell.get(), PipelineState::Finishing);
    }

    #[test]
    fn only_one_thread_wins_a_transition() {
        let cell = Arc::new(StateCell::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    cell.transition(PipelineState::Active, PipelineState::Erroring)
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }

    #[test]
    fn display_names() {
        assert_eq!(PipelineState::Erroring.to_string(), "erroring");
        assert_eq!(PipelineState::Finished.to_string(), "finished");
    }
}
