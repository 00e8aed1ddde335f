//! Error type for knob and bank configuration.

use thiserror::Error;

/// Error returned when a knob or bank edit is out of range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnobError {
    /// Target slot outside `0..4`
    #[error("target slot {slot} out of range (knobs have {max} slots)")]
    InvalidSlot {
        /// Requested slot
        slot: usize,
        /// Number of slots per knob
        max: usize,
    },
    /// More knobs supplied than the bank holds
    #[error("too many knobs: {count} supplied, bank holds {max}")]
    TooManyKnobs {
        /// Number of knobs supplied
        count: usize,
        /// Bank size
        max: usize,
    },
    /// Greed or bleed outside `-20..=20`
    #[error("{name} {value} out of range ({min}..={max})")]
    BiasOutOfRange {
        /// "greed" or "bleed"
        name: &'static str,
        /// Rejected value
        value: i32,
        /// Lower bound
        min: i32,
        /// Upper bound
        max: i32,
    },
}
