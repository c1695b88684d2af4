use thiserror::Error;

/// Broad category of a construction failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Parameters rejected before any search started
    Precondition,
    /// The grid shape admits no cycle under the requested policy
    Configuration,
    /// The algorithm broke one of its own invariants
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    #[error("{field} must be greater than zero (got {value})")]
    InvalidParameter { field: &'static str, value: usize },
    #[error("no Hamiltonian cycle exists on a {rows}x{cols} grid")]
    CycleImpossible { rows: usize, cols: usize },
    #[error("exhaustive search found no cycle in a {rows}x{cols} block")]
    SearchExhausted { rows: usize, cols: usize },
    #[error("search in a {rows}x{cols} block gave up after {budget} steps")]
    SearchBudgetExceeded {
        rows: usize,
        cols: usize,
        budget: u64,
    },
    #[error("ran out of kernels with {groups} networks still unmerged")]
    MergeExhausted { groups: usize },
    #[error("merged edges do not form a single cycle: walked {visited} of {expected} cells")]
    BrokenCycle { visited: usize, expected: usize },
    #[error("no detour through the excluded corner of a {rows}x{cols} grid")]
    CornerDetourMissing { rows: usize, cols: usize },
}

impl CycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CycleError::InvalidParameter { .. } => ErrorKind::Precondition,
            CycleError::CycleImpossible { .. } => ErrorKind::Configuration,
            CycleError::SearchExhausted { .. }
            | CycleError::SearchBudgetExceeded { .. }
            | CycleError::MergeExhausted { .. }
            | CycleError::BrokenCycle { .. }
            | CycleError::CornerDetourMissing { .. } => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, CycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            CycleError::InvalidParameter { field: "rows", value: 0 }.kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            CycleError::CycleImpossible { rows: 3, cols: 3 }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(CycleError::MergeExhausted { groups: 2 }.kind(), ErrorKind::Internal);
        assert_eq!(
            CycleError::CornerDetourMissing { rows: 5, cols: 7 }.kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_messages() {
        let err = CycleError::CycleImpossible { rows: 3, cols: 5 };
        assert_eq!(err.to_string(), "no Hamiltonian cycle exists on a 3x5 grid");
        let err = CycleError::InvalidParameter { field: "max_block_size", value: 0 };
        assert_eq!(err.to_string(), "max_block_size must be greater than zero (got 0)");
    }
}
