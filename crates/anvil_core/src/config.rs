//! # Growth Configuration
//!
//! The capacity growth policy used by [`Array`](crate::Array) when it has to
//! reallocate. Defaults reproduce the engine's canonical progression; other
//! values can be loaded once at startup from a TOML file.
//!
//! ```toml
//! initial_capacity = 16
//! growth_divisor = 3
//! growth_threshold = 256
//! growth_step = 64
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Capacity growth parameters.
///
/// Below `growth_threshold` the capacity grows by roughly x1.5 using integer
/// arithmetic (`current + (current + 1) / growth_divisor`). At or above the
/// threshold it grows by a fixed `growth_step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrowthPolicy {
    /// Capacity of the first allocation.
    pub initial_capacity: usize,
    /// Divisor of the geometric step.
    pub growth_divisor: usize,
    /// Capacity at which growth switches from geometric to linear.
    pub growth_threshold: usize,
    /// Linear step once at or above the threshold.
    pub growth_step: usize,
}

impl GrowthPolicy {
    /// The engine-wide default policy.
    pub const DEFAULT: Self = Self {
        initial_capacity: 16,
        growth_divisor: 3,
        growth_threshold: 256,
        growth_step: 64,
    };

    /// Parses and validates a policy from TOML text.
    ///
    /// Missing keys fall back to [`GrowthPolicy::DEFAULT`].
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidConfig`] if the text does not parse or the values
    /// fail [`GrowthPolicy::validate`].
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let policy: Self =
            toml::from_str(text).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Rejects policies that could stall growth.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> CoreResult<()> {
        if self.initial_capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "initial_capacity must be positive".into(),
            ));
        }
        if self.growth_divisor == 0 {
            return Err(CoreError::InvalidConfig(
                "growth_divisor must be positive".into(),
            ));
        }
        if self.growth_step == 0 {
            return Err(CoreError::InvalidConfig("growth_step must be positive".into()));
        }
        Ok(())
    }

    /// Computes the capacity to allocate when `requested` slots are needed
    /// and `current` are held.
    ///
    /// Callers only ask when `requested > current`.
    ///
    /// # Errors
    ///
    /// [`CoreError::CapacityOverflow`] if the arithmetic overflows `usize`.
    pub fn next_capacity(&self, current: usize, requested: usize) -> CoreResult<usize> {
        if current == 0 {
            return Ok(requested.max(self.initial_capacity));
        }

        let grown = if current < self.growth_threshold {
            let step = current
                .checked_add(1)
                .ok_or(CoreError::CapacityOverflow)?
                / self.growth_divisor;
            // Always grow by at least one slot
            current.checked_add(step.max(1)).ok_or(CoreError::CapacityOverflow)?
        } else {
            current
                .checked_add(self.growth_step)
                .ok_or(CoreError::CapacityOverflow)?
        };

        Ok(grown.max(requested))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
