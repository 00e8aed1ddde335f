//! Isolated vertical pipe culling.
//!
//! A pipe is a vertical pair of pixels with the same colour. Its neighbours
//! vote with these weights (`P` is the pair):
//!
//! ```text
//!         8
//!     1   8   1
//!    16   P  16
//!    16   P  16
//!     1   8   1
//!         8
//! ```
//!
//! When the pair's own colour gets no vote and the best neighbour colour
//! reaches 64, both pixels take that colour. Like dot culling, votes come
//! from a snapshot taken before the pass.

use super::{best_vote, Votes};
use crate::output::{index_at, is_color, put_index, IndexImage};

/// Minimum vote for the neighbour colour to take over.
const PIPE_THRESHOLD: u32 = 64;

/// `(dx, dy, weight)` relative to the top pixel of the pair.
const NEIGHBOURS: [(isize, isize, u32); 12] = [
    (-1, 0, 16),
    (1, 0, 16),
    (-1, 1, 16),
    (1, 1, 16),
    (0, -1, 8),
    (0, 2, 8),
    (0, -2, 8),
    (0, 3, 8),
    (-1, -1, 1),
    (1, -1, 1),
    (-1, 2, 1),
    (1, 2, 1),
];

pub fn cull_pipes(image: &mut IndexImage) {
    let (w, h) = (image.width(), image.height());
    if h < 2 {
        return;
    }
    let snapshot = image.indices().to_vec();
    let out = image.indices_mut();

    for y in 0..h - 1 {
        for x in 0..w {
            let own = index_at(&snapshot, w, x, y);
            if !is_color(own) || index_at(&snapshot, w, x, y + 1) != own {
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
                if vote >= PIPE_THRESHOLD {
                    put_index(out, w, x, y, color);
                    put_index(out, w, x, y + 1, color);
                }
            }
        }
    }
}
