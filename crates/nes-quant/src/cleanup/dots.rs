//! Isolated-dot culling.
//!
//! Every painted pixel polls its eight neighbours, weighted
//!
//! ```text
//!     1   8   1
//!    16   X  16
//!     1   8   1
//! ```
//!
//! A pixel whose own colour gets no vote is repainted with the best-voted
//! neighbour colour once that reaches 32. Votes are read from a snapshot, so
//! repaints within the pass never influence each other.

use super::{best_vote, Votes};
use crate::output::{index_at, is_color, put_index, IndexImage};

/// Minimum vote for the neighbour colour to take over.
const DOT_THRESHOLD: u32 = 32;

/// `(dx, dy, weight)` of the eight neighbours.
const NEIGHBOURS: [(isize, isize, u32); 8] = [
    (-1, -1, 1),
    (0, -1, 8),
    (1, -1, 1),
    (-1, 0, 16),
    (1, 0, 16),
    (-1, 1, 1),
    (0, 1, 8),
    (1, 1, 1),
];

pub fn cull_dots(image: &mut IndexImage) {
    let (w, h) = (image.width(), image.height());
    let snapshot = image.indices().to_vec();
    let out = image.indices_mut();

    for y in 0..h {
        for x in 0..w {
            let own = index_at(&snapshot, w, x, y);
            if !is_color(own) {
                continue;
            }

            let mut votes: Votes = [0; 64];
            for &(dx, dy, weight) in &NEIGHBOURS {
                let (nx, ny) = (x as isize + dx, y as isize + dy);
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let c = index_at(&snapshot, w, nx as usize, ny as usize);
                if is_color(c) {
                    votes[c as usize] += weight;
                }
            }

            if votes[own as usize] != 0 {
                continue;
            }
            if let Some((color, vote)) = best_vote(&votes) {
                if vote >= DOT_THRESHOLD {
                    put_index(out, w, x, y, color);
                }
            }
        }
    }
}
