use crate::types::Rect;

/// An occupied region of a sheet. Footprints are kerf-inflated when
/// committed, so overlap tests automatically reserve the cut clearance.
#[derive(Debug, Clone, Copy)]
pub struct Occupied {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
}

/// A feasible placement found for one piece: anchor plus oriented size.
#[derive(Debug, Clone, Copy)]
pub struct Fit {
    pub x: u32,
    pub y: u32,
    pub rect: Rect,
    pub rotated: bool,
}

/// Occupied-space accumulator for a single sheet instance. Created fresh
/// per sheet and owned by the packing loop; never shared.
#[derive(Debug, Clone)]
pub struct SheetSpace {
    sheet: Rect,
    kerf: u32,
    occupied: Vec<Occupied>,
}

/// Separating-axis test on both axes. Touching edges (zero-area
/// intersection) does not count as overlap.
pub fn overlaps(ax: u32, ay: u32, a: Rect, bx: u32, by: u32, b: Rect) -> bool {
    ax < bx + b.w && bx < ax + a.w && ay < by + b.h && by < ay + a.h
}

impl SheetSpace {
    pub fn new(sheet: Rect, kerf: u32) -> Self {
        Self {
            sheet,
            kerf,
            occupied: Vec::new(),
        }
    }

    pub fn occupied(&self) -> &[Occupied] {
        &self.occupied
    }

    /// Best feasible placement for `piece`, or None if it fits nowhere.
    /// Tries the unrotated orientation first, then rotated; within an
    /// orientation, candidates are visited in bottom-left order and the
    /// first non-overlapping one wins.
    pub fn find_fit(&self, piece: Rect, allow_rotate: bool) -> Option<Fit> {
        let orientations = [(piece, false), (piece.rotated(), true)];
        let tries = if allow_rotate { 2 } else { 1 };

        for &(oriented, rotated) in orientations.iter().take(tries) {
            if !oriented.fits_in(&self.sheet) {
                continue;
            }
            for (x, y) in self.candidates(oriented) {
                if x + oriented.w > self.sheet.w || y + oriented.h > self.sheet.h {
                    continue;
                }
                if !self.hits_occupied(x, y, oriented) {
                    return Some(Fit {
                        x,
                        y,
                        rect: oriented,
                        rotated,
                    });
                }
            }
        }
        None
    }

    /// Anchor points worth testing for a piece of the given oriented
    /// size: the sheet origin, plus positions derived from the corners
    /// of every occupied footprint. Sorted by (y, x) so the search
    /// realizes the bottom-left heuristic.
    fn candidates(&self, oriented: Rect) -> Vec<(u32, u32)> {
        let mut anchors = vec![(0, 0)];

        for occ in &self.occupied {
            let right = occ.x + occ.rect.w;
            let top = occ.y + occ.rect.h;

            // Right of it, bottom-aligned
            if right + oriented.w <= self.sheet.w {
                anchors.push((right, occ.y));
            }
            // Above it, left-aligned
            if top + oriented.h <= self.sheet.h {
                anchors.push((occ.x, top));
            }
            // Top-right corner
            if right + oriented.w <= self.sheet.w && top + oriented.h <= self.sheet.h {
                anchors.push((right, top));
            }
            // Right of it, top-aligned
            if oriented.h <= occ.rect.h && right + oriented.w <= self.sheet.w {
                anchors.push((right, top - oriented.h));
            }
            // Above it, right-aligned
            if oriented.w <= occ.rect.w && top + oriented.h <= self.sheet.h {
                anchors.push((right - oriented.w, top));
            }
        }

        anchors.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        anchors
    }

    fn hits_occupied(&self, x: u32, y: u32, rect: Rect) -> bool {
        self.occupied
            .iter()
            .any(|o| overlaps(x, y, rect, o.x, o.y, o.rect))
    }

    /// Records a committed placement. The stored footprint is inflated
    /// by the kerf so future pieces keep clear of the cut; the fit's own
    /// geometry is not altered.
    pub fn commit(&mut self, fit: Fit) {
        self.occupied.push(Occupied {
            x: fit.x,
            y: fit.y,
            rect: Rect::new(fit.rect.w + self.kerf, fit.rect.h + self.kerf),
        });
    }
}
