//! Cleanup passes over a finished index image.
//!
//! Passes run in a fixed order, each one full scan reading the previous
//! pass's result:
//!
//! 1. [`cull_zags`]: straighten single-step zig-zags (in place)
//! 2. [`cull_dots`]: repaint isolated pixels (from a snapshot)
//! 3. [`cull_pipes`]: repaint isolated vertical pairs (from a snapshot)
//! 4. [`clean_lines`]: template rewrites (in place)
//!
//! The in-place and snapshot passes behave differently on purpose: a zag
//! swap or line rewrite can enable the next match in the same scan, a dot
//! or pipe repaint cannot.
//!
//! Only hardware colours (`< 64`) vote or get rewritten; unset pixels are
//! left as they are.

mod dots;
mod lines;
mod options;
mod pipes;
mod zags;

pub use dots::cull_dots;
pub use lines::clean_lines;
pub use options::CleanupConfig;
pub use pipes::cull_pipes;
pub use zags::cull_zags;

use crate::output::IndexImage;

/// Per-colour vote tally.
pub(crate) type Votes = [u32; 64];

/// Highest-voted colour and its vote, lowest index on ties. `None` when
/// nothing voted.
pub(crate) fn best_vote(votes: &Votes) -> Option<(u8, u32)> {
    let mut best: Option<(u8, u32)> = None;
    for (c, &v) in votes.iter().enumerate() {
        if v == 0 {
            continue;
        }
        match best {
            Some((_, bv)) if v <= bv => {}
            _ => best = Some((c as u8, v)),
        }
    }
    best
}

/// Run the enabled passes `config.passes` times on a copy of `index`.
///
/// # Example
///
/// ```
/// use nes_quant::{cleanup, CleanupConfig, IndexImage};
///
/// let dotted = IndexImage::from_rows(&["05 05 05", "05 21 05", "05 05 05"]).unwrap();
/// let clean = cleanup(&dotted, &CleanupConfig::new().cull_dots(true));
///
/// assert_eq!(clean, IndexImage::filled(3, 3, 0x05));
/// ```
pub fn cleanup(index: &IndexImage, config: &CleanupConfig) -> IndexImage {
    let mut image = index.clone();
    cleanup_in_place(&mut image, config);
    image
}

/// [`cleanup`] without the copy.
pub fn cleanup_in_place(image: &mut IndexImage, config: &CleanupConfig) {
    for _ in 0..config.passes {
        if config.cull_zags {
            cull_zags(image);
        }
        if config.cull_dots {
            cull_dots(image);
        }
        if config.cull_pipes {
            cull_pipes(image);
        }
        if config.clean_lines {
            clean_lines(image);
        }
    }
}
