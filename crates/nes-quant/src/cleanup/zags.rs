//! Zig-zag culling.
//!
//! Scans every 3x2 window
//!
//! ```text
//!    T0  T1  T2
//!    B0  B1  B2
//! ```
//!
//! and swaps the centre pair `T1`/`B1` when at least seven of eight checks
//! say the swap would continue both rows' runs. Each corner is checked
//! twice, once for agreeing with the opposite centre and once for
//! disagreeing with its own, and every check has weight one. A single
//! foreign corner therefore costs exactly one check and still swaps. The
//! pass writes into the image it reads, so later windows see earlier swaps.

use crate::output::{index_at, is_color, put_index, IndexImage};

/// Checks that must hold out of eight before swapping.
const SWAP_THRESHOLD: usize = 7;

pub fn cull_zags(image: &mut IndexImage) {
    let (w, h) = (image.width(), image.height());
    if w < 3 || h < 2 {
        return;
    }
    let data = image.indices_mut();

    for y in 0..h - 1 {
        for x in 0..w - 2 {
            let p = index_at(data, w, x + 1, y);
            let q = index_at(data, w, x + 1, y + 1);
            if p == q || !is_color(p) || !is_color(q) {
                continue;
            }

            let t0 = index_at(data, w, x, y);
            let t2 = index_at(data, w, x + 2, y);
            let b0 = index_at(data, w, x, y + 1);
            let b2 = index_at(data, w, x + 2, y + 1);

            let checks = [
                t0 == q,
                t2 == q,
                b0 == p,
                b2 == p,
                t0 != p,
                t2 != p,
                b0 != q,
                b2 != q,
            ];
            if checks.iter().filter(|&&c| c).count() >= SWAP_THRESHOLD {
                put_index(data, w, x + 1, y, q);
                put_index(data, w, x + 1, y + 1, p);
            }
        }
    }
}
