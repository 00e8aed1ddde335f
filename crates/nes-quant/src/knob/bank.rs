//! The fixed, ordered bank of knobs.

use std::ops::{Index, IndexMut};

use super::error::KnobError;
use super::knob::ColorKnob;

/// Number of knobs in a bank.
pub const BANK_SIZE: usize = 16;

/// Fixed set of [`BANK_SIZE`] knobs.
///
/// Order is significant: the quantizer enumerates knobs (and their target
/// slots) in bank order, and the first of several equally good candidates
/// wins. A default bank has every knob unused.
///
/// # Example
///
/// ```
/// use nes_quant::{ColorKnob, KnobBank};
///
/// let bank = KnobBank::from_knobs(&[ColorKnob::new(0x0F), ColorKnob::new(0x30)]).unwrap();
/// assert_eq!(bank.active_count(), 2);
/// assert_eq!(bank[1].hardware_index, 0x30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KnobBank([ColorKnob; BANK_SIZE]);

impl Default for KnobBank {
    fn default() -> Self {
        Self([ColorKnob::default(); BANK_SIZE])
    }
}

impl KnobBank {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bank whose leading knobs are `knobs`; the rest stay unused.
    pub fn from_knobs(knobs: &[ColorKnob]) -> Result<Self, KnobError> {
        if knobs.len() > BANK_SIZE {
            return Err(KnobError::TooManyKnobs {
                count: knobs.len(),
                max: BANK_SIZE,
            });
        }
        let mut bank = Self::default();
        bank.0[..knobs.len()].copy_from_slice(knobs);
        Ok(bank)
    }

    /// Put every knob back to the unused state.
    pub fn reset(&mut self) {
        self.0 = [ColorKnob::default(); BANK_SIZE];
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&ColorKnob> {
        self.0.get(i)
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut ColorKnob> {
        self.0.get_mut(i)
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ColorKnob> {
        self.0.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ColorKnob> {
        self.0.iter_mut()
    }

    #[inline]
    pub fn as_slice(&self) -> &[ColorKnob] {
        &self.0
    }

    /// Knobs that have at least one enabled target.
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|k| k.any_enabled()).count()
    }

    /// Whether no knob can win any sub-pixel.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

impl Index<usize> for KnobBank {
    type Output = ColorKnob;

    #[inline]
    fn index(&self, i: usize) -> &ColorKnob {
        &self.0[i]
    }
}

impl IndexMut<usize> for KnobBank {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut ColorKnob {
        &mut self.0[i]
    }
}

impl<'a> IntoIterator for &'a KnobBank {
    type Item = &'a ColorKnob;
    type IntoIter = std::slice::Iter<'a, ColorKnob>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgb, NO_COLOR};

    #[test]
    fn test_default_bank_is_all_unused() {
        let bank = KnobBank::default();
        assert!(bank.iter().all(|k| k.hardware_index == NO_COLOR));
        assert!(bank.is_empty());
        assert_eq!(bank.iter().count(), BANK_SIZE);
    }

    #[test]
    fn test_from_knobs_keeps_order() {
        let knobs = [ColorKnob::new(5), ColorKnob::new(3), ColorKnob::new(9)];
        let bank = KnobBank::from_knobs(&knobs).unwrap();
        assert_eq!(bank[0].hardware_index, 5);
        assert_eq!(bank[1].hardware_index, 3);
        assert_eq!(bank[2].hardware_index, 9);
        assert_eq!(bank[3], ColorKnob::default());
        assert_eq!(bank.active_count(), 3);
    }

    #[test]
    fn test_from_knobs_too_many() {
        let knobs = vec![ColorKnob::new(0); BANK_SIZE + 1];
        assert_eq!(
            KnobBank::from_knobs(&knobs),
            Err(KnobError::TooManyKnobs { count: 17, max: 16 })
        );
    }

    #[test]
    fn test_reset() {
        let mut bank = KnobBank::from_knobs(&[ColorKnob::with_primary(1, Rgb::RED)]).unwrap();
        bank[4].set_bleed(3);
        bank.reset();
        assert_eq!(bank, KnobBank::default());
    }

    #[test]
    fn test_get_out_of_range() {
        let mut bank = KnobBank::new();
        assert!(bank.get(BANK_SIZE).is_none());
        assert!(bank.get_mut(BANK_SIZE - 1).is_some());
    }
}
