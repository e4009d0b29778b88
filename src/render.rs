use crate::types::{Rect, SheetLayout};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

pub fn render_sheet(layout: &SheetLayout) -> String {
    let sheet = layout.sheet;
    let scale = f64::min(MAX_WIDTH / sheet.w as f64, MAX_HEIGHT / sheet.h as f64);
    let grid_w = (sheet.w as f64 * scale).round() as usize;
    let grid_h = (sheet.h as f64 * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    // Draw sheet border first
    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    // Shade reusable offcuts so they read apart from unusable scrap
    for r in &layout.remaining {
        let sx = (r.x as f64 * scale).round() as usize;
        let sy = (r.y as f64 * scale).round() as usize;
        let sw = (r.rect.w as f64 * scale).round() as usize;
        let sh = (r.rect.h as f64 * scale).round() as usize;

        for row in grid.iter_mut().skip(sy + 1).take(sh.saturating_sub(1)) {
            for c in row.iter_mut().skip(sx + 1).take(sw.saturating_sub(1)) {
                *c = '.';
            }
        }
    }

    // Draw each placement over the shading
    for p in &layout.placements {
        let sx = (p.x as f64 * scale).round() as usize;
        let sy = (p.y as f64 * scale).round() as usize;
        let sw = (p.rect.w as f64 * scale).round() as usize;
        let sh = (p.rect.h as f64 * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        for row in grid.iter_mut().skip(sy + 1).take(sh.saturating_sub(1)) {
            for c in row.iter_mut().skip(sx + 1).take(sw.saturating_sub(1)) {
                *c = ' ';
            }
        }
        draw_rect(&mut grid, sx, sy, sw, sh);

        let label = format!("{}x{}", p.rect.w, p.rect.h);
        let label_chars: Vec<char> = label.chars().collect();

        if sw > 2 && sh > 0 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            let half = label_chars.len() / 2;
            let start_x = cx.saturating_sub(half);

            for (i, &ch) in label_chars.iter().enumerate() {
                let x = start_x + i;
                if x > sx && x < sx + sw && cy > sy && cy < sy + sh {
                    grid[cy][x] = ch;
                }
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

#[allow(clippy::needless_range_loop)]
fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    let rows = grid.len();
    let cols = if rows > 0 { grid[0].len() } else { return };

    // Horizontal edges
    for i in x..=x + w {
        if i < cols {
            if y < rows {
                grid[y][i] = if grid[y][i] == '|' || grid[y][i] == '+' {
                    '+'
                } else {
                    '-'
                };
            }
            if y + h < rows {
                grid[y + h][i] = if grid[y + h][i] == '|' || grid[y + h][i] == '+' {
                    '+'
                } else {
                    '-'
                };
            }
        }
    }

    // Vertical edges
    for j in y..=y + h {
        if j < rows {
            if x < cols {
                grid[j][x] = if grid[j][x] == '-' || grid[j][x] == '+' {
                    '+'
                } else {
                    '|'
                };
            }
            if x + w < cols {
                grid[j][x + w] = if grid[j][x + w] == '-' || grid[j][x + w] == '+' {
                    '+'
                } else {
                    '|'
                };
            }
        }
    }

    // Corners
    for &cx in &[x, x + w] {
        for &cy in &[y, y + h] {
            if cy < rows && cx < cols {
                grid[cy][cx] = '+';
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlacedPiece, RemainingPiece};

    fn layout(
        sheet: Rect,
        placements: Vec<PlacedPiece>,
        remaining: Vec<RemainingPiece>,
    ) -> SheetLayout {
        SheetLayout {
            sheet_label: "ply".to_string(),
            sheet_index: 0,
            sheet,
            kerf: 0,
            placements,
            waste_percent: 0.0,
            remaining,
        }
    }

    fn placed(rect: Rect, x: u32, y: u32) -> PlacedPiece {
        PlacedPiece {
            label: "piece".to_string(),
            instance: 0,
            rect,
            x,
            y,
            rotated: false,
        }
    }

    #[test]
    fn test_render_single_piece() {
        let l = layout(
            Rect::new(100, 50),
            vec![placed(Rect::new(100, 50), 0, 0)],
            vec![],
        );
        let output = render_sheet(&l);
        assert!(output.contains('+'));
        assert!(output.contains('-'));
        assert!(output.contains('|'));
        assert!(output.contains("100x50"));
    }

    #[test]
    fn test_render_two_pieces() {
        let l = layout(
            Rect::new(100, 100),
            vec![
                placed(Rect::new(50, 100), 0, 0),
                placed(Rect::new(50, 100), 50, 0),
            ],
            vec![],
        );
        let output = render_sheet(&l);
        assert!(output.contains("50x100"));
    }

    #[test]
    fn test_render_empty() {
        let l = layout(Rect::new(100, 100), vec![], vec![]);
        let output = render_sheet(&l);
        // Should still draw the sheet border
        assert!(output.contains('+'));
    }

    #[test]
    fn test_render_offcut_shading() {
        let l = layout(
            Rect::new(1000, 1000),
            vec![placed(Rect::new(1000, 500), 0, 0)],
            vec![RemainingPiece {
                rect: Rect::new(1000, 500),
                x: 0,
                y: 500,
                sheet_label: "ply".to_string(),
            }],
        );
        let output = render_sheet(&l);
        assert!(output.contains('.'));
        assert!(output.contains("1000x500"));
    }
}
