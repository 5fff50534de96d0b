mod batch;
mod report;
mod vision;

use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use taipai::{Decision, Hand};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Shanten, ukeire and discard advice for Taiwanese 16-tile mahjong hands.
///
/// Tiles may be written as `1C 5D 9B East 3F`, `1m 5p 9s 1z`, compact runs such
/// as `123m 11z`, or by their Chinese names.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Worker threads, one per core if not given
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one hand
    Calc {
        #[arg(required = true)]
        tiles: Vec<String>,
        /// Tiles seen on the table, they lower the remaining counts
        #[arg(long, num_args = 1..)]
        visible: Vec<String>,
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate every line of the matched files, gzip or plain, as JSON lines
    Batch {
        #[arg(required = true)]
        patterns: Vec<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Grade the recommendation in a vision service result, `-` for stdin
    Check {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn calc(tiles: &[String], visible: &[String], json: bool) -> Result<()> {
    let raw = tiles.join(" ");
    let hand: Hand = raw.parse().with_context(|| format!("error when reading hand {raw:?}"))?;
    let seen = taipai::hand::hand(&visible.join(" ")).context("error when reading visible tiles")?;
    let decision = Decision::new(&hand, &seen)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        println!("{}", report::to_log_string(&hand, &decision));
    }
    Ok(())
}

fn check(input: &Path, json: bool) -> Result<()> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("error when reading {}", input.display()))?
    };
    let result: vision::AnalysisResult = serde_json::from_str(&raw).context("not a vision result")?;
    let checked = vision::check(&result)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&checked)?);
        return Ok(());
    }
    let verdict = checked.verdict.to_string();
    println!("{}", report::to_log_string(&checked.hand, &checked.decision));
    println!(
        "vision: {:?} {} ({:.0}%) -> {}",
        checked.action,
        result.recommendation.tile,
        checked.confidence * 100.0,
        match checked.verdict {
            vision::Verdict::Best | vision::Verdict::Holding => style(&verdict).green(),
            _ => style(&verdict).red(),
        },
    );
    if !result.recommendation.reasoning.is_empty() {
        println!("  {}", style(&result.recommendation.reasoning).dim());
    }
    if !result.safe_tiles.is_empty() {
        println!("  safe: {}", result.safe_tiles.join(" "));
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to set up the thread pool")?;
    }

    match cli.command {
        Command::Calc { tiles, visible, json } => calc(&tiles, &visible, json),
        Command::Check { input, json } => check(&input, json),
        Command::Batch { patterns, output } => {
            let summary = batch::run(&patterns, output.as_deref())?;
            eprintln!(
                "{} hands from {} files, {}",
                summary.hands,
                summary.files,
                if summary.errors > 0 {
                    style(format!("{} errors", summary.errors)).red()
                } else {
                    style("no errors".to_owned()).green()
                },
            );
            Ok(())
        }
    }
}
