//! Tuning parameters for [`Table`](crate::Table).
//!
//! The default maximum load ratio is picked at compile time from the
//! `max-load-*` features. When several are enabled the lowest ratio wins.

use crate::error::ConfigError;

cfg_if::cfg_if! {
    if #[cfg(feature = "max-load-fifty")] {
        /// Load ratio above which an insert grows the table.
        pub const DEFAULT_MAX_LOAD_RATIO: f64 = 0.5;
    } else if #[cfg(feature = "max-load-seventy-five")] {
        /// Load ratio above which an insert grows the table.
        pub const DEFAULT_MAX_LOAD_RATIO: f64 = 0.75;
    } else {
        /// Load ratio above which an insert grows the table.
        pub const DEFAULT_MAX_LOAD_RATIO: f64 = 0.9;
    }
}

/// Slot count of a table built with [`Table::new`](crate::Table::new).
pub const DEFAULT_CAPACITY: usize = 8;

/// Multiplier applied to the slot count on growth.
pub const DEFAULT_GROWTH_FACTOR: usize = 3;

/// Read-only tuning for a table: initial slot count, growth trigger and
/// growth multiplier.
///
/// Fields are only reachable through validating setters, so every
/// `TableConfig` that exists is usable.
///
/// # Examples
///
/// ```rust
/// use probe_table::Table;
/// use probe_table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_initial_capacity(16)
///     .with_max_load_ratio(0.5)
///     .unwrap()
///     .with_growth_factor(2)
///     .unwrap();
///
/// let table: Table<u32> = Table::with_config(config);
/// assert_eq!(table.capacity(), 16);
///
/// assert!(TableConfig::default().with_max_load_ratio(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    initial_capacity: usize,
    max_load_ratio: f64,
    growth_factor: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_ratio: DEFAULT_MAX_LOAD_RATIO,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl TableConfig {
    /// Sets the number of slots allocated up front. Zero is allowed; the
    /// first insert then allocates.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load ratio above which inserts grow the table.
    ///
    /// Must be in `(0, 1)` so that at least one slot stays empty and every
    /// probe sequence terminates.
    pub fn with_max_load_ratio(mut self, ratio: f64) -> Result<Self, ConfigError> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ConfigError::InvalidLoadRatio(ratio));
        }
        self.max_load_ratio = ratio;
        Ok(self)
    }

    /// Sets the slot-count multiplier used on growth.
    pub fn with_growth_factor(mut self, factor: usize) -> Result<Self, ConfigError> {
        if factor < 2 {
            return Err(ConfigError::InvalidGrowthFactor(factor));
        }
        self.growth_factor = factor;
        Ok(self)
    }

    /// Slots allocated when the table is created.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Load ratio above which inserts grow the table.
    pub fn max_load_ratio(&self) -> f64 {
        self.max_load_ratio
    }

    /// Slot-count multiplier used on growth.
    pub fn growth_factor(&self) -> usize {
        self.growth_factor
    }

    /// Returns `true` if `occupied` slots out of `capacity` exceed the
    /// maximum load ratio.
    #[inline]
    pub(crate) fn exceeds(&self, occupied: usize, capacity: usize) -> bool {
        capacity == 0 || occupied as f64 / capacity as f64 > self.max_load_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(all(
        feature = "max-load-ninety",
        not(feature = "max-load-seventy-five"),
        not(feature = "max-load-fifty")
    ))]
    fn defaults() {
        let config = TableConfig::default();
        assert_eq!(config.initial_capacity(), 8);
        assert_eq!(config.max_load_ratio(), 0.9);
        assert_eq!(config.growth_factor(), 3);
    }

    #[test]
    fn rejects_bad_ratios() {
        for ratio in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            assert!(matches!(
                TableConfig::default().with_max_load_ratio(ratio),
                Err(ConfigError::InvalidLoadRatio(_))
            ));
        }
        assert!(TableConfig::default().with_max_load_ratio(0.99).is_ok());
    }

    #[test]
    fn rejects_bad_growth() {
        assert_eq!(
            TableConfig::default().with_growth_factor(1),
            Err(ConfigError::InvalidGrowthFactor(1))
        );
        assert_eq!(
            TableConfig::default()
                .with_growth_factor(4)
                .map(|c| c.growth_factor()),
            Ok(4)
        );
    }

    #[test]
    fn exceeds_is_strict() {
        let config = TableConfig::default().with_max_load_ratio(0.9).unwrap();
        assert!(!config.exceeds(7, 8));
        assert!(config.exceeds(8, 8));
        assert!(!config.exceeds(9, 10));
        assert!(config.exceeds(1, 0));
    }
}
