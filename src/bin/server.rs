use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cutplan::solver::Solver;
use cutplan::types::{OptimizationResult, Piece, StockSheet};
use serde::Deserialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize)]
struct OptimizeRequest {
    sheets: Vec<StockSheet>,
    pieces: Vec<Piece>,
    #[serde(default)]
    max_placements: Option<u64>,
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizationResult>, (StatusCode, String)> {
    tracing::info!(
        sheets = req.sheets.len(),
        pieces = req.pieces.len(),
        "POST /optimize"
    );

    for sheet in &req.sheets {
        if sheet.rect.w == 0 || sheet.rect.h == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("sheet '{}' dimensions must be non-zero", sheet.label),
            ));
        }
    }
    for piece in &req.pieces {
        if piece.rect.w == 0 || piece.rect.h == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("piece '{}' dimensions must be non-zero", piece.label),
            ));
        }
    }

    let mut solver = Solver::new(req.sheets, req.pieces);
    if let Some(limit) = req.max_placements {
        solver = solver.with_max_placements(limit);
    }

    Ok(Json(solver.solve()))
}

fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
        .block_on(serve());
}

async fn serve() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
