//! CLI for maze generation

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dfs_maze::bitmap::save_bitmap;
use dfs_maze::config::{Config, DEFAULT_CELLS, DEFAULT_IMAGE_SIZE, DEFAULT_OUTPUT};
use dfs_maze::maze_generator::seeded_rng;

/// Print a progress dot after this many carved cells
const PROGRESS_INTERVAL: usize = 1000;

/// Depth-first search random maze generator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Cells along one side of the maze
    #[arg(short, long, default_value_t = DEFAULT_CELLS)]
    cells: usize,

    /// Image width and height in pixels
    #[arg(short, long, default_value_t = DEFAULT_IMAGE_SIZE)]
    size: usize,

    /// Image width in pixels, overrides `--size`
    #[arg(long)]
    width: Option<usize>,

    /// Image height in pixels, overrides `--size`
    #[arg(long)]
    height: Option<usize>,

    /// Output bitmap file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Also draw the maze on the terminal
    #[arg(short, long)]
    print: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            cells: args.cells,
            width: args.width.unwrap_or(args.size),
            height: args.height.unwrap_or(args.size),
            output: args.output,
            seed: args.seed,
        }
    }
}

/// Print a progress dot every [PROGRESS_INTERVAL] carved cells.
fn report_progress<W: Write>(out: &mut W, carved: usize) -> io::Result<()> {
    if carved % PROGRESS_INTERVAL == 0 {
        write!(out, ".")?;
        out.flush()?;
    }
    Ok(())
}

fn print_banner() {
    println!("Depth-first Search Random Maze Generator");
    println!("Version {}", env!("CARGO_PKG_VERSION"));
    println!();
}

/// Generate maze, save bitmap
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let print = args.print;
    let config = Config::from(args);

    print_banner();
    println!(
        "Generating {} x {} maze into {} x {} bitmap",
        config.cells, config.cells, config.width, config.height
    );

    let random = seeded_rng(config.seed);
    let mut stdout = io::stdout();
    let mut progress = Ok(());
    let maze = dfs_maze::generate_image(&config, random, |carved| {
        if progress.is_ok() {
            progress = report_progress(&mut stdout, carved);
        }
    })
    .context("Failed to generate maze")?;
    progress.context("Failed to print progress")?;
    println!();

    if print {
        println!("{}", maze.grid);
    }

    save_bitmap(&config.output, &maze.pixels)
        .with_context(|| format!("Failed to save maze to {}", config.output.display()))?;
    println!("Saved {}", config.output.display());
    Ok(())
}
