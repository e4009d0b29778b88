use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// One stock sheet type; expands into `quantity` physical sheet instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSheet {
    pub label: String,
    pub rect: Rect,
    pub quantity: u32,
    #[serde(default)]
    pub kerf: u32,
}

/// One required piece type; expands into `quantity` unit pieces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub label: String,
    pub rect: Rect,
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub allow_rotate: bool,
}

fn default_true() -> bool {
    true
}

/// A committed placement. `rect` is the as-cut (oriented) size, so a
/// rotated piece records its swapped dimensions here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub label: String,
    pub instance: u32,
    pub rect: Rect,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

/// A reusable offcut left over on a finished sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemainingPiece {
    pub rect: Rect,
    pub x: u32,
    pub y: u32,
    pub sheet_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetLayout {
    pub sheet_label: String,
    pub sheet_index: u32,
    pub sheet: Rect,
    pub kerf: u32,
    pub placements: Vec<PlacedPiece>,
    pub waste_percent: f64,
    pub remaining: Vec<RemainingPiece>,
}

impl SheetLayout {
    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Layouts in the order sheet instances were consumed. Sheets on
    /// which nothing fit are omitted.
    pub layouts: Vec<SheetLayout>,
    pub total_waste: f64,
    pub total_sheets: usize,
    pub efficiency: f64,
    /// Unit pieces that could not be placed on any sheet.
    pub unplaced: usize,
    /// Unit pieces left unevaluated because the placement budget ran out.
    pub not_evaluated: usize,
}

impl OptimizationResult {
    pub fn placed_count(&self) -> usize {
        self.layouts.iter().map(|l| l.placements.len()).sum()
    }
}
