use crate::placement::Occupied;
use crate::types::{Rect, RemainingPiece};

/// Tuning for offcut detection. `resolution` is the grid cell size in
/// sheet units and must be at least 1; `min_usable` is the smallest
/// dimension worth keeping as a reusable offcut.
#[derive(Debug, Clone, Copy)]
pub struct OffcutConfig {
    pub resolution: u32,
    pub min_usable: u32,
}

impl Default for OffcutConfig {
    fn default() -> Self {
        Self {
            resolution: 10,
            min_usable: 100,
        }
    }
}

/// Decomposes a finished sheet's unused area into usable rectangles.
///
/// The sheet is discretized at `resolution`, occupied footprints are
/// stamped onto the grid, and free cells are grown row-major into
/// rectangles: width first along the row, then whole rows upward while
/// every cell stays free. The growth is scan-order dependent, so one
/// contiguous free region can come back as several smaller offcuts;
/// that fragmentation is accepted, not corrected.
pub fn extract(
    sheet: Rect,
    sheet_label: &str,
    occupied: &[Occupied],
    config: &OffcutConfig,
) -> Vec<RemainingPiece> {
    let cell = config.resolution;
    let grid_w = sheet.w.div_ceil(cell) as usize;
    let grid_h = sheet.h.div_ceil(cell) as usize;
    if grid_w == 0 || grid_h == 0 {
        return Vec::new();
    }

    let mut blocked = vec![vec![false; grid_w]; grid_h];
    for occ in occupied {
        let x0 = (occ.x / cell) as usize;
        let y0 = (occ.y / cell) as usize;
        let x1 = ((occ.x + occ.rect.w).div_ceil(cell) as usize).min(grid_w);
        let y1 = ((occ.y + occ.rect.h).div_ceil(cell) as usize).min(grid_h);
        for row in blocked.iter_mut().take(y1).skip(y0) {
            for c in row.iter_mut().take(x1).skip(x0) {
                *c = true;
            }
        }
    }

    let mut visited = vec![vec![false; grid_w]; grid_h];
    let mut offcuts = Vec::new();

    for y in 0..grid_h {
        for x in 0..grid_w {
            if blocked[y][x] || visited[y][x] {
                continue;
            }

            // Grow right along the row, then upward by whole rows
            let mut w = 0;
            while x + w < grid_w && !blocked[y][x + w] && !visited[y][x + w] {
                w += 1;
            }
            let mut h = 0;
            'grow: while y + h < grid_h {
                for i in 0..w {
                    if blocked[y + h][x + i] || visited[y + h][x + i] {
                        break 'grow;
                    }
                }
                h += 1;
            }

            let rect = Rect::new(w as u32 * cell, h as u32 * cell);
            if rect.w >= config.min_usable && rect.h >= config.min_usable {
                offcuts.push(RemainingPiece {
                    rect,
                    x: x as u32 * cell,
                    y: y as u32 * cell,
                    sheet_label: sheet_label.to_string(),
                });
            }

            for row in visited.iter_mut().take(y + h).skip(y) {
                for c in row.iter_mut().take(x + w).skip(x) {
                    *c = true;
                }
            }
        }
    }

    offcuts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(x: u32, y: u32, w: u32, h: u32) -> Occupied {
        Occupied {
            x,
            y,
            rect: Rect::new(w, h),
        }
    }

    #[test]
    fn test_empty_sheet_is_one_offcut() {
        let offcuts = extract(
            Rect::new(1000, 1000),
            "ply",
            &[],
            &OffcutConfig::default(),
        );
        assert_eq!(offcuts.len(), 1);
        assert_eq!(offcuts[0].rect, Rect::new(1000, 1000));
        assert_eq!((offcuts[0].x, offcuts[0].y), (0, 0));
        assert_eq!(offcuts[0].sheet_label, "ply");
    }

    #[test]
    fn test_full_sheet_has_no_offcuts() {
        let offcuts = extract(
            Rect::new(1000, 1000),
            "ply",
            &[occ(0, 0, 1000, 1000)],
            &OffcutConfig::default(),
        );
        assert!(offcuts.is_empty());
    }

    #[test]
    fn test_top_strip_offcut() {
        let offcuts = extract(
            Rect::new(1000, 1000),
            "ply",
            &[occ(0, 0, 1000, 900)],
            &OffcutConfig::default(),
        );
        assert_eq!(offcuts.len(), 1);
        assert_eq!(offcuts[0].rect, Rect::new(1000, 100));
        assert_eq!((offcuts[0].x, offcuts[0].y), (0, 900));
    }

    #[test]
    fn test_narrow_strip_below_threshold_dropped() {
        let offcuts = extract(
            Rect::new(1000, 1000),
            "ply",
            &[occ(0, 0, 1000, 950)],
            &OffcutConfig::default(),
        );
        assert!(offcuts.is_empty());
    }

    // A single L-shaped free region fragments into two rectangles: the
    // scan finds the right column first and runs it the full sheet
    // height, leaving the area above the piece as a second offcut.
    #[test]
    fn test_l_region_fragments_in_scan_order() {
        let offcuts = extract(
            Rect::new(1000, 1000),
            "ply",
            &[occ(0, 0, 400, 300)],
            &OffcutConfig::default(),
        );
        assert_eq!(offcuts.len(), 2);
        assert_eq!(offcuts[0].rect, Rect::new(600, 1000));
        assert_eq!((offcuts[0].x, offcuts[0].y), (400, 0));
        assert_eq!(offcuts[1].rect, Rect::new(400, 700));
        assert_eq!((offcuts[1].x, offcuts[1].y), (0, 300));
    }

    #[test]
    fn test_min_usable_is_tunable() {
        let config = OffcutConfig {
            resolution: 10,
            min_usable: 700,
        };
        let offcuts = extract(Rect::new(1000, 1000), "ply", &[occ(0, 0, 400, 300)], &config);
        // 600x1000 fails the 700 floor on width; 400x700 fails on width too
        assert!(offcuts.is_empty());

        let config = OffcutConfig {
            resolution: 10,
            min_usable: 600,
        };
        let offcuts = extract(Rect::new(1000, 1000), "ply", &[occ(0, 0, 400, 300)], &config);
        assert_eq!(offcuts.len(), 1);
        assert_eq!(offcuts[0].rect, Rect::new(600, 1000));
    }

    #[test]
    fn test_partial_cell_coverage_blocks_whole_cell() {
        // A footprint ending mid-cell blocks the full cell, so the free
        // strip next to it starts on the next cell boundary.
        let offcuts = extract(
            Rect::new(1000, 1000),
            "ply",
            &[occ(0, 0, 405, 1000)],
            &OffcutConfig::default(),
        );
        assert_eq!(offcuts.len(), 1);
        assert_eq!((offcuts[0].x, offcuts[0].y), (410, 0));
        assert_eq!(offcuts[0].rect, Rect::new(590, 1000));
    }

    #[test]
    fn test_kerf_inflated_footprint_past_edge_is_clamped() {
        // Inflated footprints can stick out past the sheet; stamping
        // must not index outside the grid.
        let offcuts = extract(
            Rect::new(1000, 1000),
            "ply",
            &[occ(600, 600, 405, 405)],
            &OffcutConfig::default(),
        );
        assert!(!offcuts.is_empty());
        for o in &offcuts {
            assert!(o.rect.w >= 100 && o.rect.h >= 100);
        }
    }
}
