use crate::error::{CycleError, Result};
use serde::{Deserialize, Serialize};

/// Default upper bound on the cell count of a single block
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 20;

/// What to do with a grid whose sides are both odd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddGridPolicy {
    /// Refuse to build: no cycle can cover an odd number of cells
    #[default]
    Reject,
    /// Leave (0, 0) out of the cycle
    #[cfg(feature = "corner-exclusion")]
    ExcludeCorner,
}

/// Parameters of one cycle construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default = "default_max_block_size")]
    pub max_block_size: usize,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    /// Seed for the kernel shuffle; fresh entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub odd_grid: OddGridPolicy,
}

fn default_max_block_size() -> usize {
    DEFAULT_MAX_BLOCK_SIZE
}

fn default_shuffle() -> bool {
    true
}

impl CycleConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            shuffle: true,
            seed: None,
            odd_grid: OddGridPolicy::Reject,
        }
    }

    pub fn max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn odd_grid(mut self, policy: OddGridPolicy) -> Self {
        self.odd_grid = policy;
        self
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether the built cycle skips (0, 0)
    pub fn excludes_corner(&self) -> bool {
        self.corner_requested() && self.rows % 2 == 1 && self.cols % 2 == 1
    }

    #[cfg(feature = "corner-exclusion")]
    fn corner_requested(&self) -> bool {
        self.odd_grid == OddGridPolicy::ExcludeCorner
    }

    #[cfg(not(feature = "corner-exclusion"))]
    fn corner_requested(&self) -> bool {
        false
    }

    /// Check every precondition before any search runs
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("rows", self.rows),
            ("cols", self.cols),
            ("max_block_size", self.max_block_size),
        ] {
            if value == 0 {
                return Err(CycleError::InvalidParameter { field, value });
            }
        }

        let impossible = CycleError::CycleImpossible {
            rows: self.rows,
            cols: self.cols,
        };
        if self.rows < 2 || self.cols < 2 {
            return Err(impossible);
        }
        if self.rows % 2 == 1 && self.cols % 2 == 1 && !self.excludes_corner() {
            return Err(impossible);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CycleConfig::new(24, 32);
        assert_eq!(config.max_block_size, 20);
        assert!(config.shuffle);
        assert_eq!(config.seed, None);
        assert_eq!(config.odd_grid, OddGridPolicy::Reject);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_parameters_are_rejected() {
        assert_eq!(
            CycleConfig::new(0, 4).validate(),
            Err(CycleError::InvalidParameter { field: "rows", value: 0 })
        );
        assert_eq!(
            CycleConfig::new(4, 0).validate(),
            Err(CycleError::InvalidParameter { field: "cols", value: 0 })
        );
        assert_eq!(
            CycleConfig::new(4, 4).max_block_size(0).validate(),
            Err(CycleError::InvalidParameter {
                field: "max_block_size",
                value: 0
            })
        );
    }

    #[test]
    fn test_thin_and_odd_grids_are_impossible() {
        assert_eq!(
            CycleConfig::new(1, 8).validate(),
            Err(CycleError::CycleImpossible { rows: 1, cols: 8 })
        );
        assert_eq!(
            CycleConfig::new(5, 7).validate(),
            Err(CycleError::CycleImpossible { rows: 5, cols: 7 })
        );
        assert!(CycleConfig::new(5, 6).validate().is_ok());
    }

    #[cfg(feature = "corner-exclusion")]
    #[test]
    fn test_corner_exclusion_only_applies_to_odd_grids() {
        let odd = CycleConfig::new(5, 7).odd_grid(OddGridPolicy::ExcludeCorner);
        assert!(odd.excludes_corner());
        assert!(odd.validate().is_ok());

        let even = CycleConfig::new(4, 7).odd_grid(OddGridPolicy::ExcludeCorner);
        assert!(!even.excludes_corner());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: CycleConfig = serde_json::from_str(r#"{"rows": 6, "cols": 8}"#).unwrap();
        assert_eq!(config, CycleConfig::new(6, 8));

        let json = serde_json::to_string(&CycleConfig::new(6, 8).seed(3)).unwrap();
        let back: CycleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, Some(3));
    }
}
