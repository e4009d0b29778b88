use clap::Parser;
use cutplan::render;
use cutplan::solver::Solver;
use cutplan::types::{Piece, Rect, StockSheet};

#[derive(Parser)]
#[command(
    name = "cutplan",
    about = "2D rectangular cutting stock optimizer with offcut tracking"
)]
struct Cli {
    /// Stock sheets as WxH:qty[:kerf] (e.g. 2440x1220:3:4)
    #[arg(long = "sheet", num_args = 1..)]
    sheets: Vec<String>,

    /// Cut pieces as WxH:qty (e.g. 800x600:3 400x300:5)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Disable piece rotation
    #[arg(long)]
    no_rotate: bool,

    /// Cap on placement attempts; exceeding it returns a partial result
    #[arg(long)]
    max_placements: Option<u64>,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if w == 0 || h == 0 {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(w, h))
}

fn parse_sheet(s: &str) -> Result<StockSheet, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(format!("invalid sheet '{}', expected WxH:qty[:kerf]", s));
    }
    let rect = parse_dimensions(parts[0])?;
    let quantity = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    let kerf = if parts.len() == 3 {
        parts[2]
            .parse::<u32>()
            .map_err(|_| format!("invalid kerf in '{}'", s))?
    } else {
        0
    };
    Ok(StockSheet {
        label: parts[0].to_string(),
        rect,
        quantity,
        kerf,
    })
}

fn parse_cut(s: &str, allow_rotate: bool) -> Result<Piece, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected WxH:qty", s));
    }
    let rect = parse_dimensions(parts[0])?;
    let quantity = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    if quantity == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    Ok(Piece {
        label: parts[0].to_string(),
        rect,
        quantity,
        allow_rotate,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let sheets: Vec<StockSheet> = cli
        .sheets
        .iter()
        .map(|s| parse_sheet(s))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    let pieces: Vec<Piece> = cli
        .cuts
        .iter()
        .map(|c| parse_cut(c, !cli.no_rotate))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    // Validate every piece fits at least one sheet type (considering rotation)
    for piece in &pieces {
        let fits_somewhere = sheets.iter().any(|s| {
            piece.rect.fits_in(&s.rect)
                || (piece.allow_rotate && piece.rect.rotated().fits_in(&s.rect))
        });
        if !fits_somewhere {
            eprintln!("Error: piece {} does not fit any stock sheet", piece.rect);
            std::process::exit(1);
        }
    }

    let mut solver = Solver::new(sheets, pieces);
    if let Some(limit) = cli.max_placements {
        solver = solver.with_max_placements(limit);
    }
    let result = solver.solve();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result).unwrap());
        return;
    }

    for layout in &result.layouts {
        println!(
            "Sheet {} #{} ({:.1}% waste):",
            layout.sheet_label,
            layout.sheet_index + 1,
            layout.waste_percent
        );
        for p in &layout.placements {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  {} @ ({}, {}){}", p.rect, p.x, p.y, rot);
        }
        for r in &layout.remaining {
            println!("  offcut {} @ ({}, {})", r.rect, r.x, r.y);
        }
        if cli.layout {
            print!("{}", render::render_sheet(layout));
        }
        println!();
    }

    println!(
        "Summary: {} sheet{} used, {:.1}% waste, {:.1}% efficiency",
        result.total_sheets,
        if result.total_sheets == 1 { "" } else { "s" },
        result.total_waste,
        result.efficiency,
    );
    if result.unplaced > 0 {
        println!(
            "Warning: {} piece{} could not be placed",
            result.unplaced,
            if result.unplaced == 1 { "" } else { "s" },
        );
    }
    if result.not_evaluated > 0 {
        println!(
            "Note: placement budget exhausted; {} piece{} not evaluated",
            result.not_evaluated,
            if result.not_evaluated == 1 { "" } else { "s" },
        );
    }
}
