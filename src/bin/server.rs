use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use cut_planner::solver::{Solver, expand_cuts};
use cut_planner::types::{CutSpec, FailureRecord, Layout, Placement, Rect};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequest {
    #[serde(default, deserialize_with = "cut_planner::types::deserialize_u32_from_number")]
    board_width: u32,
    #[serde(default, deserialize_with = "cut_planner::types::deserialize_u32_from_number")]
    board_height: u32,
    #[serde(default = "default_boards")]
    num_boards: f64,
    cuts: Vec<CutSpec>,
}

fn default_boards() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
struct PackResponse {
    placements: Vec<Placement>,
    failures: Vec<FailureRecord>,
    placed_count: usize,
    failed_count: usize,
    total_piece_area: u64,
    total_board_area: f64,
    utilization_percent: f64,
}

impl From<Layout> for PackResponse {
    fn from(layout: Layout) -> Self {
        Self {
            placed_count: layout.placed_count(),
            failed_count: layout.failed_count(),
            total_piece_area: layout.total_piece_area,
            total_board_area: layout.total_board_area,
            utilization_percent: layout.utilization_percent,
            placements: layout.placements,
            failures: layout.failures,
        }
    }
}

fn run_pack(req: PackRequest) -> Result<PackResponse, (StatusCode, String)> {
    if req.board_width == 0 || req.board_height == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "please enter board dimensions".to_string(),
        ));
    }
    if !(req.num_boards > 0.0) {
        return Err((
            StatusCode::BAD_REQUEST,
            "please enter a valid number of boards (minimum 0.5)".to_string(),
        ));
    }
    if expand_cuts(&req.cuts).is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "please add at least one cut piece".to_string(),
        ));
    }

    let stock = Rect::new(req.board_width, req.board_height);
    let layout = Solver::new(stock, req.num_boards, req.cuts)
        .solve()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(layout.into())
}

async fn pack(
    Json(req): Json<PackRequest>,
) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    run_pack(req).map(Json)
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("failed to open development.log: {e}");
            std::process::exit(1);
        }
    };

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
        .route("/pack", post(pack))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    eprintln!("Listening on {addr}");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server stopped");
    }
}
