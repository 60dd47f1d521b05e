use clap::Parser;
use cut_planner::solver::{Solver, expand_cuts};
use cut_planner::types::{CutSpec, Layout, Rect};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "cut_planner",
    about = "Greedy multi-board cut planner with clearance and rotation"
)]
struct Cli {
    /// Board dimensions (WxH, e.g. 2440x1220)
    #[arg(long)]
    board: String,

    /// Number of boards; any fractional part adds one half-height board
    #[arg(long, default_value_t = 1.0)]
    boards: f64,

    /// Cut pieces as WxH:qty (e.g. 800x600:3 400x300:5)
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Print the layout as JSON
    #[arg(long)]
    json: bool,

    /// Log every board pass to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let width = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    Ok(Rect::new(width, height))
}

fn parse_cut(s: &str) -> Result<CutSpec, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected WxH:qty", s));
    }
    let rect = parse_dimensions(parts[0])?;
    let quantity = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok(CutSpec::new(rect.w, rect.h, quantity))
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn board_text(num_boards: f64) -> String {
    if num_boards == 1.0 {
        "board".to_string()
    } else {
        format!("{} boards", num_boards)
    }
}

fn print_layout(layout: &Layout) {
    let boards = board_text(layout.num_boards);
    if layout.all_placed() {
        println!("All {} pieces fit in {}!", layout.placed_count(), boards);
    } else {
        println!(
            "{} piece(s) don't fit | {} placed successfully in {}",
            layout.failed_count(),
            layout.placed_count(),
            boards
        );
    }
    println!();

    for usage in layout.boards() {
        let half = if usage.is_partial { " (Half)" } else { "" };
        println!("Board #{}{}:", usage.board_number, half);
        for p in layout.placements_on(usage.board_number) {
            let rot = if p.rotated { " [rotated]" } else { "" };
            println!("  Piece #{}: {} at ({}, {}){}", p.piece_id + 1, p.rect, p.x, p.y, rot);
        }
        println!();
    }

    if !layout.all_placed() {
        println!("Does not fit:");
        for f in &layout.failures {
            println!("  Piece #{}: {}", f.piece_id + 1, f.rect);
        }
        println!();
    }

    println!("Total cut area:   {} mm²", layout.total_piece_area);
    println!("Total board area: {} mm²", layout.total_board_area);
    println!("Utilization:      {:.2}%", layout.utilization_percent);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let board = parse_dimensions(&cli.board).unwrap_or_else(|e| fail(e));
    if board.w == 0 || board.h == 0 {
        fail("please enter board dimensions");
    }
    if !(cli.boards > 0.0) {
        fail("please enter a valid number of boards (minimum 0.5)");
    }

    let cuts: Vec<CutSpec> = cli
        .cuts
        .iter()
        .map(|c| parse_cut(c))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| fail(e));
    if expand_cuts(&cuts).is_empty() {
        fail("please add at least one cut piece");
    }

    let layout = Solver::new(board, cli.boards, cuts)
        .solve()
        .unwrap_or_else(|e| fail(e));

    if cli.json {
        match serde_json::to_string_pretty(&layout) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(e),
        }
    } else {
        print_layout(&layout);
    }
}
