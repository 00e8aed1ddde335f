//! Template-driven line cleanup.
//!
//! Five small templates describe line shapes with a one-pixel defect. Each
//! cell is one of:
//!
//! - `0`, `1`, `2`: colour group; all cells of a group must share a colour
//!   and the groups must differ from each other
//! - `A`: rewritten to group 1's colour on a match
//! - `B`: rewritten to group 2's colour on a match
//! - `.`: ignored
//!
//! Every template is tried at every position with all four mirror variants.
//! Rewrites land in the image immediately, so later matches see them.

use crate::output::{index_at, is_color, put_index, IndexImage};

/// One cleanup template, rows top to bottom.
struct Template {
    rows: &'static [&'static str],
}

impl Template {
    fn width(&self) -> usize {
        self.rows[0].len()
    }

    fn height(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, x: usize, y: usize) -> u8 {
        self.rows[y].as_bytes()[x]
    }
}

const TEMPLATES: [Template; 5] = [
    // Vertical line with a one-pixel gap
    Template {
        rows: &["010", "0A0", "010", "010"],
    },
    // Horizontal line with a one-pixel gap
    Template {
        rows: &["0000", "1A11", "0000"],
    },
    // Diagonal with a bump on its upper side
    Template {
        rows: &["1B22", "0122", "0012", "0001"],
    },
    // Diagonal with a notch on its lower side
    Template {
        rows: &["1222", "0A22", "0012", "0001"],
    },
    // Edge between two areas with a one-pixel nick
    Template {
        rows: &["2222", "2B22", "1111", "0000"],
    },
];

/// Mirror variants: (flip horizontally, flip vertically).
const FLIPS: [(bool, bool); 4] = [(false, false), (true, false), (false, true), (true, true)];

pub fn clean_lines(image: &mut IndexImage) {
    let (w, h) = (image.width(), image.height());
    let data = image.indices_mut();

    for y in 0..h {
        for x in 0..w {
            for template in &TEMPLATES {
                let (tw, th) = (template.width(), template.height());
                if x + tw > w || y + th > h {
                    continue;
                }
                for &(flip_x, flip_y) in &FLIPS {
                    apply(data, w, x, y, template, flip_x, flip_y);
                }
            }
        }
    }
}

/// Try one template variant at `(x, y)` and rewrite on a match.
fn apply(data: &mut [u8], stride: usize, x: usize, y: usize, t: &Template, flip_x: bool, flip_y: bool) {
    let (tw, th) = (t.width(), t.height());
    let pos = |cx: usize, cy: usize| {
        let ix = if flip_x { tw - 1 - cx } else { cx };
        let iy = if flip_y { th - 1 - cy } else { cy };
        (x + ix, y + iy)
    };

    let mut groups: [Option<u8>; 3] = [None; 3];
    for cy in 0..th {
        for cx in 0..tw {
            let g = match t.cell(cx, cy) {
                b @ b'0'..=b'2' => (b - b'0') as usize,
                _ => continue,
            };
            let (px, py) = pos(cx, cy);
            let c = index_at(data, stride, px, py);
            match groups[g] {
                None => groups[g] = Some(c),
                Some(prev) if prev == c => {}
                Some(_) => return,
            }
        }
    }

    match groups[0] {
        Some(c) if is_color(c) => {}
        _ => return,
    }
    for i in 0..3 {
        for j in i + 1..3 {
            if let (Some(a), Some(b)) = (groups[i], groups[j]) {
                if a == b {
                    return;
                }
            }
        }
    }

    for cy in 0..th {
        for cx in 0..tw {
            let fill = match t.cell(cx, cy) {
                b'A' => groups[1],
                b'B' => groups[2],
                _ => continue,
            };
            if let Some(c) = fill.filter(|&c| is_color(c)) {
                let (px, py) = pos(cx, cy);
                put_index(data, stride, px, py, c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_templates_are_rectangular() {
        for t in &TEMPLATES {
            assert!(t.rows.iter().all(|r| r.len() == t.width()));
            assert!(t.rows.iter().any(|r| r.contains('0')));
        }
        let sizes: Vec<_> = TEMPLATES.iter().map(|t| (t.width(), t.height())).collect();
        assert_eq!(sizes, vec![(3, 4), (4, 3), (4, 4), (4, 4), (4, 4)]);
    }

    #[test]
    fn test_diagonal_bump_is_smoothed() {
        let mut image = IndexImage::from_rows(&[
            "16 16 30 30", //
            "0F 16 30 30",
            "0F 0F 16 30",
            "0F 0F 0F 16",
        ])
        .unwrap();
        clean_lines(&mut image);
        assert_eq!(
            image,
            IndexImage::from_rows(&[
                "16 30 30 30", //
                "0F 16 30 30",
                "0F 0F 16 30",
                "0F 0F 0F 16",
            ])
            .unwrap()
        );
    }

    #[test]
    fn test_broken_group_prevents_rewrite() {
        let mut image = IndexImage::from_rows(&[
            "16 16 30 30", //
            "0F 16 30 30",
            "0F 0F 16 30",
            "0F 0F 0F 0F",
        ])
        .unwrap();
        let before = image.clone();
        clean_lines(&mut image);
        assert_eq!(image, before);
    }

    #[test]
    fn test_mirrored_match() {
        // Horizontal mirror of the diagonal-bump case
        let mut image = IndexImage::from_rows(&[
            "30 30 16 16", //
            "30 30 16 0F",
            "30 16 0F 0F",
            "16 0F 0F 0F",
        ])
        .unwrap();
        clean_lines(&mut image);
        assert_eq!(image.get(2, 0), 0x30);
    }

    #[test]
    fn test_vertical_gap_is_filled() {
        let mut image = IndexImage::from_rows(&[
            "0F 16 0F", //
            "0F 0F 0F",
            "0F 16 0F",
            "0F 16 0F",
        ])
        .unwrap();
        clean_lines(&mut image);
        assert_eq!(image.get(1, 1), 0x16);
    }

    #[test]
    fn test_unset_background_never_matches() {
        let mut image = IndexImage::from_rows(&[
            ".. 16 ..", //
            ".. .. ..",
            ".. 16 ..",
            ".. 16 ..",
        ])
        .unwrap();
        let before = image.clone();
        clean_lines(&mut image);
        assert_eq!(image, before);
    }

    #[test]
    fn test_too_small_for_any_template() {
        let mut image = IndexImage::from_rows(&["01 02", "02 01"]).unwrap();
        let before = image.clone();
        clean_lines(&mut image);
        assert_eq!(image, before);
    }
}
