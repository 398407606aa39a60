use crate::metadata::Version;

// Iterator over the encoding region of a QR symbol
//------------------------------------------------------------------------------

/// Yields `(row, column)` coordinates of the encoding region in placement
/// order: column pairs right to left, alternating upward and downward,
/// skipping the vertical timing column and every reserved module.
#[derive(Clone)]
pub struct EncRegionIter {
    coords: std::vec::IntoIter<(i16, i16)>,
}

impl EncRegionIter {
    pub fn new(ver: Version) -> Self {
        let w = ver.width() as i16;
        let mut coords = Vec::with_capacity((w * w) as usize);
        let mut col = w - 1;
        let mut upward = true;
        while col > 0 {
            // The vertical timing column is not part of any column pair
            if col == 6 {
                col -= 1;
            }
            for i in 0..w {
                let r = if upward { w - 1 - i } else { i };
                for c in [col, col - 1] {
                    if !is_reserved(ver, r, c) {
                        coords.push((r, c));
                    }
                }
            }
            col -= 2;
            upward = !upward;
        }
        Self { coords: coords.into_iter() }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<Self::Item> {
        self.coords.next()
    }
}

// Checks if the module is reserved for a functional pattern or info area
fn is_reserved(ver: Version, r: i16, c: i16) -> bool {
    let w = ver.width() as i16;

    // Top left finder & format info
    if r < 9 && c < 9 {
        return true;
    }

    // Top right finder & format info
    if r < 9 && c >= w - 8 {
        return true;
    }

    // Bottom left finder & format info
    if r >= w - 8 && c < 9 {
        return true;
    }

    // Timing patterns
    if r == 6 || c == 6 {
        return true;
    }

    // Version info areas
    if matches!(ver, Version::Normal(7..=40)) {
        // Top right
        if (0..=5).contains(&r) && (w - 11..=w - 9).contains(&c) {
            return true;
        }

        // Bottom left
        if (w - 11..=w - 9).contains(&r) && (0..=5).contains(&c) {
            return true;
        }
    }

    // Alignment patterns
    let ap = ver.alignment_pattern();
    for &ar in ap {
        for &ac in ap {
            if (ar == 6 && (ac == 6 || ac == w - 7)) || (ar == w - 7 && ac == 6) {
                continue;
            }
            if ar - 2 <= r && r <= ar + 2 && ac - 2 <= c && c <= ac + 2 {
                return true;
            }
        }
    }

    false
}
