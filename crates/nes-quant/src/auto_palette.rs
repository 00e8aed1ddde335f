//! Median-cut knob bank from a source image.
//!
//! All source pixels start in one bucket. The bucket with the widest channel
//! spread is sorted along that channel and split in half until there are as
//! many buckets as requested knobs. Each bucket's average then claims the
//! nearest hardware colour not taken by an earlier bucket.

use crate::buffer::PixelBuffer;
use crate::color::{hardware_color, nearest_hardware_index, Rgb, HARDWARE_COLOR_COUNT};
use crate::knob::{ColorKnob, KnobBank, BANK_SIZE};

/// Default knob count for a fresh auto palette.
pub const DEFAULT_COUNT: usize = 4;

struct Bucket {
    colors: Vec<Rgb>,
    /// Per-channel `max - min`.
    extent: [u8; 3],
}

impl Bucket {
    fn new(colors: Vec<Rgb>) -> Self {
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for c in &colors {
            for (ch, v) in c.to_bytes().into_iter().enumerate() {
                lo[ch] = lo[ch].min(v);
                hi[ch] = hi[ch].max(v);
            }
        }
        let extent = std::array::from_fn(|ch| hi[ch].saturating_sub(lo[ch]));
        Self { colors, extent }
    }

    /// Channel with the widest spread; red wins ties over green over blue.
    fn dominant_channel(&self) -> usize {
        let [r, g, b] = self.extent;
        if r >= g && r >= b {
            0
        } else if g >= b {
            1
        } else {
            2
        }
    }

    fn spread(&self) -> u8 {
        self.extent[self.dominant_channel()]
    }

    /// Channel-wise truncated mean.
    fn average(&self) -> Rgb {
        let n = self.colors.len().max(1) as u64;
        let mut sum = [0u64; 3];
        for c in &self.colors {
            for (ch, v) in c.to_bytes().into_iter().enumerate() {
                sum[ch] += v as u64;
            }
        }
        Rgb::new((sum[0] / n) as u8, (sum[1] / n) as u8, (sum[2] / n) as u8)
    }

    /// Sort along the dominant channel and split at `len / 2`.
    fn split(mut self) -> (Bucket, Bucket) {
        let ch = self.dominant_channel();
        self.colors.sort_by_key(|c| c.channel(ch));
        let right = self.colors.split_off(self.colors.len() / 2);
        (Bucket::new(self.colors), Bucket::new(right))
    }
}

/// Build a knob bank with up to `count` knobs by median cut over `source`.
///
/// `count` is clamped to the bank size. Each knob gets one enabled target:
/// the bucket average when `exact_mapping` is set, otherwise the chosen
/// hardware colour itself. Remaining knobs stay unused. An empty source or a
/// zero count gives an all-unused bank.
///
/// ```
/// use nes_quant::{auto_palette, PixelBuffer, Rgb};
///
/// let source = PixelBuffer::filled(8, 8, Rgb::new(255, 0, 0));
/// let bank = auto_palette(&source, 1, true);
/// assert_eq!(bank[0].targets[0], Rgb::new(255, 0, 0));
/// assert!(!bank[1].has_color());
/// ```
pub fn auto_palette(source: &PixelBuffer, count: usize, exact_mapping: bool) -> KnobBank {
    let count = count.min(BANK_SIZE);
    let mut bank = KnobBank::new();
    if count == 0 || source.is_empty() {
        return bank;
    }

    let mut buckets = vec![Bucket::new(source.pixels().collect())];
    while buckets.len() < count {
        let mut pick = 0;
        for (i, b) in buckets.iter().enumerate().skip(1) {
            if b.spread() > buckets[pick].spread() {
                pick = i;
            }
        }
        if buckets[pick].colors.len() < 2 {
            break;
        }
        let (left, right) = buckets.remove(pick).split();
        buckets.insert(pick, left);
        buckets.push(right);
    }

    let mut used = [false; HARDWARE_COLOR_COUNT];
    for (knob, bucket) in bank.iter_mut().zip(&buckets) {
        let average = bucket.average();
        let Some(index) = nearest_hardware_index(average, |i| used[i as usize]) else {
            break;
        };
        used[index as usize] = true;
        let target = if exact_mapping {
            average
        } else {
            hardware_color(index).unwrap_or(average)
        };
        *knob = ColorKnob::with_primary(index, target);
    }

    tracing::debug!(requested = count, created = buckets.len(), exact_mapping, "auto palette");
    bank
}
