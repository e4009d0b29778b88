use crate::freespace::{self, OffcutConfig};
use crate::placement::{Fit, SheetSpace};
use crate::types::{OptimizationResult, Piece, PlacedPiece, Rect, SheetLayout, StockSheet};

/// One physical sheet out of a stock entry's quantity.
#[derive(Debug, Clone)]
pub struct SheetInstance {
    pub label: String,
    pub index: u32,
    pub rect: Rect,
    pub kerf: u32,
}

/// One individually placeable piece out of a demand entry's quantity.
#[derive(Debug, Clone)]
pub struct UnitPiece {
    pub label: String,
    pub index: u32,
    pub rect: Rect,
    pub allow_rotate: bool,
}

pub fn expand_sheets(sheets: &[StockSheet]) -> Vec<SheetInstance> {
    let mut instances = Vec::new();
    for sheet in sheets {
        for i in 0..sheet.quantity {
            instances.push(SheetInstance {
                label: sheet.label.clone(),
                index: i,
                rect: sheet.rect,
                kerf: sheet.kerf,
            });
        }
    }
    instances
}

pub fn expand_pieces(pieces: &[Piece]) -> Vec<UnitPiece> {
    let mut units = Vec::new();
    for piece in pieces {
        for i in 0..piece.quantity {
            units.push(UnitPiece {
                label: piece.label.clone(),
                index: i,
                rect: piece.rect,
                allow_rotate: piece.allow_rotate,
            });
        }
    }
    // Sort by area descending for largest-first packing; the sort is
    // stable, so equal areas keep their input order
    units.sort_by(|a, b| b.rect.area().cmp(&a.rect.area()));
    units
}

/// Ranks feasible placements within one packing pass; the highest score
/// is committed. Swap the implementation to change the packing
/// heuristic without touching the sheet loop.
pub trait PlacementScore {
    fn score(&self, placed: Rect, x: u32, y: u32) -> i64;
}

/// Reference heuristic: area dominates, then lower-left position breaks
/// near-ties, so the largest remaining piece that fits goes first.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaBottomLeft;

impl PlacementScore for AreaBottomLeft {
    fn score(&self, placed: Rect, x: u32, y: u32) -> i64 {
        placed.area() as i64 * 1000 + (1_000_000 - (x as i64 + y as i64))
    }
}

pub struct Solver {
    sheets: Vec<StockSheet>,
    pieces: Vec<Piece>,
    offcuts: OffcutConfig,
    scorer: Box<dyn PlacementScore>,
    max_placements: Option<u64>,
}

impl Solver {
    pub fn new(sheets: Vec<StockSheet>, pieces: Vec<Piece>) -> Self {
        Self {
            sheets,
            pieces,
            offcuts: OffcutConfig::default(),
            scorer: Box::new(AreaBottomLeft),
            max_placements: None,
        }
    }

    pub fn with_offcuts(mut self, offcuts: OffcutConfig) -> Self {
        self.offcuts = offcuts;
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn PlacementScore>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Caps the number of placement-engine invocations. On exhaustion the
    /// solver stops and reports the leftover pieces as not evaluated
    /// instead of running the full O(pieces^2) search.
    pub fn with_max_placements(mut self, limit: u64) -> Self {
        self.max_placements = Some(limit);
        self
    }

    pub fn solve(&self) -> OptimizationResult {
        let units = expand_pieces(&self.pieces);
        let mut placed = vec![false; units.len()];
        let mut placed_count = 0usize;
        let mut attempts: u64 = 0;
        let mut exhausted = false;
        let mut layouts: Vec<SheetLayout> = Vec::new();

        // Sheets are consumed strictly in input order; the shared
        // `placed` set makes later sheets depend on earlier outcomes.
        for instance in expand_sheets(&self.sheets) {
            if exhausted || placed_count == units.len() {
                break;
            }

            let mut space = SheetSpace::new(instance.rect, instance.kerf);
            let mut placements: Vec<PlacedPiece> = Vec::new();

            loop {
                // Scan every unplaced piece and keep the single best fit
                let mut best: Option<(usize, Fit, i64)> = None;
                for (i, unit) in units.iter().enumerate() {
                    if placed[i] {
                        continue;
                    }
                    if self.max_placements.is_some_and(|limit| attempts >= limit) {
                        exhausted = true;
                        break;
                    }
                    attempts += 1;
                    if let Some(fit) = space.find_fit(unit.rect, unit.allow_rotate) {
                        let score = self.scorer.score(fit.rect, fit.x, fit.y);
                        if best.is_none() || score > best.unwrap().2 {
                            best = Some((i, fit, score));
                        }
                    }
                }

                if exhausted {
                    break;
                }
                let Some((i, fit, _)) = best else {
                    break;
                };

                let unit = &units[i];
                tracing::debug!(
                    piece = %unit.label,
                    instance = unit.index,
                    x = fit.x,
                    y = fit.y,
                    rotated = fit.rotated,
                    sheet = %instance.label,
                    "placed piece"
                );
                space.commit(fit);
                placements.push(PlacedPiece {
                    label: unit.label.clone(),
                    instance: unit.index,
                    rect: fit.rect,
                    x: fit.x,
                    y: fit.y,
                    rotated: fit.rotated,
                });
                placed[i] = true;
                placed_count += 1;
            }

            // A sheet nothing landed on produces no layout at all
            if placements.is_empty() {
                continue;
            }

            let used: u64 = placements.iter().map(|p| p.rect.area()).sum();
            let sheet_area = instance.rect.area();
            let waste_percent = (sheet_area - used) as f64 / sheet_area as f64 * 100.0;
            let remaining =
                freespace::extract(instance.rect, &instance.label, space.occupied(), &self.offcuts);

            layouts.push(SheetLayout {
                sheet_label: instance.label,
                sheet_index: instance.index,
                sheet: instance.rect,
                kerf: instance.kerf,
                placements,
                waste_percent,
                remaining,
            });
        }

        let total_sheets = layouts.len();
        // Unweighted mean of per-sheet percentages; guarded so an empty
        // result reports 0 waste, not NaN
        let total_waste = if layouts.is_empty() {
            0.0
        } else {
            layouts.iter().map(|l| l.waste_percent).sum::<f64>() / total_sheets as f64
        };

        let unplaced = units.len() - placed_count;
        if unplaced > 0 {
            tracing::warn!(
                unplaced,
                "pieces could not be placed; larger or more stock sheets needed"
            );
        }

        OptimizationResult {
            layouts,
            total_waste,
            total_sheets,
            efficiency: 100.0 - total_waste,
            unplaced,
            not_evaluated: if exhausted { unplaced } else { 0 },
        }
    }
}
