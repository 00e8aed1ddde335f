//! A single colour knob.

use super::error::KnobError;
use crate::color::{hardware_color, Rgb, HARDWARE_COLOR_COUNT, NO_COLOR};

/// Number of candidate source colours per knob.
pub const TARGET_SLOTS: usize = 4;

/// Lowest accepted greed/bleed value.
pub const BIAS_MIN: i32 = -20;

/// Highest accepted greed/bleed value.
pub const BIAS_MAX: i32 = 20;

/// Binding from one hardware colour to up to four source colours.
///
/// Slot 0 is conventionally the primary target. Equality and ordering are
/// structural over every field, so two knobs with identical settings compare
/// equal regardless of where they sit in a bank.
///
/// # Example
///
/// ```
/// use nes_quant::{ColorKnob, Rgb};
///
/// let mut knob = ColorKnob::new(0x16);
/// knob.set_target(1, Rgb::new(255, 0, 0)).unwrap();
/// knob.set_greed(5);
///
/// assert!(knob.greed_factor() < 1.0);
/// assert_eq!(knob.enabled_targets().count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorKnob {
    /// Hardware colour index; `>= 64` means the knob paints nothing.
    pub hardware_index: u8,
    /// Candidate source colours.
    pub targets: [Rgb; TARGET_SLOTS],
    /// Which of `targets` take part in matching.
    pub enabled: [bool; TARGET_SLOTS],
    greed: i32,
    bleed: i32,
}

impl Default for ColorKnob {
    fn default() -> Self {
        Self {
            hardware_index: NO_COLOR,
            targets: [Rgb::BLACK; TARGET_SLOTS],
            enabled: [false; TARGET_SLOTS],
            greed: 0,
            bleed: 0,
        }
    }
}

impl ColorKnob {
    /// Knob for `hardware_index` whose primary target is the hardware colour
    /// itself. A "no colour" index yields a knob with no enabled targets.
    pub fn new(hardware_index: u8) -> Self {
        let mut knob = Self {
            hardware_index,
            ..Self::default()
        };
        if let Some(rgb) = hardware_color(hardware_index) {
            knob.targets[0] = rgb;
            knob.enabled[0] = true;
        }
        knob
    }

    /// Unused knob (no colour, nothing enabled).
    #[inline]
    pub fn unused() -> Self {
        Self::default()
    }

    /// Knob with a single enabled primary target.
    pub fn with_primary(hardware_index: u8, target: Rgb) -> Self {
        let mut knob = Self {
            hardware_index,
            ..Self::default()
        };
        knob.targets[0] = target;
        knob.enabled[0] = true;
        knob
    }

    /// Whether the knob paints a real hardware colour.
    #[inline]
    pub fn has_color(&self) -> bool {
        (self.hardware_index as usize) < HARDWARE_COLOR_COUNT
    }

    #[inline]
    pub fn greed(&self) -> i32 {
        self.greed
    }

    #[inline]
    pub fn bleed(&self) -> i32 {
        self.bleed
    }

    /// Set greed, clamped to `-20..=20`. Returns whether the value changed.
    pub fn set_greed(&mut self, value: i32) -> bool {
        let value = value.clamp(BIAS_MIN, BIAS_MAX);
        if self.greed == value {
            return false;
        }
        self.greed = value;
        true
    }

    /// Set bleed, clamped to `-20..=20`. Returns whether the value changed.
    pub fn set_bleed(&mut self, value: i32) -> bool {
        let value = value.clamp(BIAS_MIN, BIAS_MAX);
        if self.bleed == value {
            return false;
        }
        self.bleed = value;
        true
    }

    /// Strict variant of [`set_greed`](Self::set_greed) for untrusted input.
    pub fn try_set_greed(&mut self, value: i32) -> Result<bool, KnobError> {
        check_bias("greed", value)?;
        Ok(self.set_greed(value))
    }

    /// Strict variant of [`set_bleed`](Self::set_bleed) for untrusted input.
    pub fn try_set_bleed(&mut self, value: i32) -> Result<bool, KnobError> {
        check_bias("bleed", value)?;
        Ok(self.set_bleed(value))
    }

    /// Distance multiplier: `1.1^(-greed)`.
    #[inline]
    pub fn greed_factor(&self) -> f32 {
        1.1f32.powi(-self.greed)
    }

    /// Vote multiplier: `2^bleed`.
    #[inline]
    pub fn bleed_factor(&self) -> f32 {
        2.0f32.powi(self.bleed)
    }

    /// Enable `slot` with the given source colour.
    pub fn set_target(&mut self, slot: usize, rgb: Rgb) -> Result<(), KnobError> {
        check_slot(slot)?;
        self.targets[slot] = rgb;
        self.enabled[slot] = true;
        Ok(())
    }

    /// Disable `slot`. The stored colour is kept so re-enabling restores it.
    pub fn remove_mapping(&mut self, slot: usize) -> Result<(), KnobError> {
        check_slot(slot)?;
        self.enabled[slot] = false;
        Ok(())
    }

    /// Map `slot` to the knob's own hardware colour. On a "no colour" knob
    /// this disables the slot instead.
    pub fn use_hardware_color(&mut self, slot: usize) -> Result<(), KnobError> {
        match hardware_color(self.hardware_index) {
            Some(rgb) => self.set_target(slot, rgb),
            None => self.remove_mapping(slot),
        }
    }

    /// Change the hardware colour.
    ///
    /// When the knob had no enabled target, or its primary target still
    /// tracked the previous hardware colour, the primary target follows the
    /// new colour so the knob keeps attracting its own shade.
    pub fn set_hardware_index(&mut self, index: u8) {
        if let Some(new_rgb) = hardware_color(index) {
            let follows_old = self.enabled[0]
                && hardware_color(self.hardware_index) == Some(self.targets[0]);
            if !self.any_enabled() || follows_old {
                self.targets[0] = new_rgb;
                self.enabled[0] = true;
            }
        }
        self.hardware_index = index;
    }

    #[inline]
    pub fn any_enabled(&self) -> bool {
        self.enabled.iter().any(|&e| e)
    }

    /// `(slot, colour)` of every enabled target, in slot order.
    pub fn enabled_targets(&self) -> impl Iterator<Item = (usize, Rgb)> + '_ {
        self.targets
            .iter()
            .zip(self.enabled.iter())
            .enumerate()
            .filter(|(_, (_, &on))| on)
            .map(|(slot, (&rgb, _))| (slot, rgb))
    }
}

fn check_slot(slot: usize) -> Result<(), KnobError> {
    if slot >= TARGET_SLOTS {
        return Err(KnobError::InvalidSlot {
            slot,
            max: TARGET_SLOTS,
        });
    }
    Ok(())
}

fn check_bias(name: &'static str, value: i32) -> Result<(), KnobError> {
    if !(BIAS_MIN..=BIAS_MAX).contains(&value) {
        return Err(KnobError::BiasOutOfRange {
            name,
            value,
            min: BIAS_MIN,
            max: BIAS_MAX,
        });
    }
    Ok(())
}
