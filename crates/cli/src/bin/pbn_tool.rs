use bidding_cli::board_utils::{check_board, format_board, format_report};
use bidding_types::io::pbn;
use bidding_types::Board;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pbn-tool",
    author,
    version,
    about = "Inspect, validate and normalize bridge board records"
)]
struct Args {
    /// Log parse anomalies at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay every auction and report illegal or inconsistent calls
    Check {
        file: PathBuf,

        /// Emit one JSON report per board
        #[arg(long)]
        json: bool,
    },
    /// Print boards with their hands and auctions
    Show {
        file: PathBuf,

        /// Emit the parsed boards as JSON
        #[arg(long)]
        json: bool,

        /// Indent JSON output
        #[arg(long)]
        pretty: bool,

        /// Only show the North and South calls
        #[arg(long)]
        ns: bool,

        /// Text placed after each auction round
        #[arg(long, env = "PBN_TOOL_SEPARATOR", default_value = " | ")]
        separator: String,
    },
    /// Parse every board and write it back in canonical form
    Normalize {
        file: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init()
        .ok();
}

/// Parses each board separately so one broken record does not hide the
/// rest of the file.
fn load_boards(path: &Path) -> Result<(Vec<Board>, usize), Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let blocks = pbn::split_boards(&text);
    debug!(path = %path.display(), blocks = blocks.len(), "read board file");

    let mut boards = Vec::new();
    let mut failures = 0;
    for (i, block) in blocks.iter().enumerate() {
        match pbn::import_board(block) {
            Ok(board) => boards.push(board),
            Err(e) => {
                failures += 1;
                eprintln!("{}: record {}: {e}", path.display(), i + 1);
            }
        }
    }
    Ok((boards, failures))
}

fn run(args: Args) -> Result<bool, Box<dyn Error>> {
    match args.command {
        Command::Check { file, json } => {
            let (boards, failures) = load_boards(&file)?;
            let mut clean = failures == 0;
            for board in &boards {
                let report = check_board(board);
                clean &= report.is_clean();
                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    print!("{}", format_report(&report));
                }
            }
            info!(boards = boards.len(), failures, "check finished");
            Ok(clean)
        }
        Command::Show {
            file,
            json,
            pretty,
            ns,
            separator,
        } => {
            let (boards, failures) = load_boards(&file)?;
            if json {
                let out = if pretty {
                    serde_json::to_string_pretty(&boards)?
                } else {
                    serde_json::to_string(&boards)?
                };
                println!("{out}");
            } else {
                for board in &boards {
                    println!("{}", format_board(board, &separator, ns));
                }
            }
            Ok(failures == 0)
        }
        Command::Normalize { file, output } => {
            let (boards, failures) = load_boards(&file)?;
            let text = pbn::write_boards(&boards)?;
            match output {
                Some(path) => {
                    fs::write(&path, text)?;
                    info!(path = %path.display(), boards = boards.len(), "wrote boards");
                }
                None => print!("{text}"),
            }
            Ok(failures == 0)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if !run(args)? {
        std::process::exit(1);
    }
    Ok(())
}
