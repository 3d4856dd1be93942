use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use bucket_boggle::{BoardSize, BucketBoggler, CompactTrie, NodeArena, ScoreDetails, letter_char};

/// Upper bound on the best score of any board in a bucket board class.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Dictionary file, one word per line
    #[arg(long, default_value = "words")]
    dictionary: PathBuf,

    /// Board dimensions as two digits, rows then columns
    #[arg(long, default_value = "33")]
    size: BoardSize,

    /// Build the breaking tree and report forced scores
    #[arg(long)]
    build_tree: bool,

    /// Arena budget for the packed dictionary, in MiB
    #[arg(long, default_value_t = 5)]
    arena_mb: usize,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// One token of candidate letters per cell
    #[arg(required = true)]
    cells: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    board: String,
    score: u32,
    num_reps: u64,
    details: &'a ScoreDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<TreeReport>,
}

#[derive(Serialize)]
struct TreeReport {
    recomputed: u32,
    pruned: u32,
    nodes: usize,
    choice_stats: BTreeMap<usize, usize>,
    forces: Vec<Force>,
}

#[derive(Serialize)]
struct Force {
    cell: usize,
    letter: char,
    score: u32,
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bucket_boggle=info,ibucket=info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr));

    let _ = tracing::dispatcher::set_global_default(tracing::Dispatch::new(subscriber));
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let text = std::fs::read_to_string(&args.dictionary)
        .with_context(|| format!("couldn't load dictionary {}", args.dictionary.display()))?;
    let arena = NodeArena::with_capacity(args.arena_mb << 20);
    let dict = CompactTrie::from_words(text.split_whitespace(), arena)
        .context("couldn't pack dictionary")?;
    info!(
        words = dict.size(),
        bytes = dict.memory_usage(),
        "loaded dictionary"
    );

    let mut solver = BucketBoggler::new(dict.root(), args.size);
    solver.set_build_tree(args.build_tree);

    let board = args.cells.join(" ");
    if let Err(e) = solver.parse_board(&board) {
        bail!("couldn't parse '{board}': {e}");
    }

    let start = Instant::now();
    let score = solver.simple_upper_bound();
    let elapsed = start.elapsed();

    let tree = match solver.take_tree() {
        Some(mut tree) => {
            let start = Instant::now();
            let recomputed = tree.recompute_score();
            info!(elapsed = ?start.elapsed(), "recomputed score");

            tree.prune();
            let start = Instant::now();
            let pruned = tree.recompute_score();
            info!(elapsed = ?start.elapsed(), "recomputed pruned score");

            let mut choice_stats = BTreeMap::new();
            tree.choice_stats(&mut choice_stats);

            tree.attach_possibilities();
            let forces = tree
                .possibilities()
                .iter()
                .map(|(cell, letter)| {
                    let score = tree
                        .score_with_force(cell, letter)
                        .with_context(|| format!("forcing cell {cell}"))?;
                    Ok(Force {
                        cell,
                        letter: letter_char(letter),
                        score,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Some(TreeReport {
                recomputed,
                pruned,
                nodes: tree.node_count(),
                choice_stats,
                forces,
            })
        }
        None => None,
    };

    let report = Report {
        board: solver.board().to_string(),
        score,
        num_reps: solver.num_reps(),
        details: solver.details(),
        tree,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Board: {}", report.board);
    println!("Score: {}", report.score);
    println!("{:.6} secs elapsed", elapsed.as_secs_f64());
    println!("Details:");
    println!(
        " num_reps: {} = {:.6}B",
        report.num_reps,
        report.num_reps as f64 / 1.0e9
    );
    println!(" sum_union: {}", report.details.sum_union);
    println!(" max_nomark: {}", report.details.max_nomark);

    if let Some(tree) = &report.tree {
        println!("Recomputed score: {}", tree.recomputed);
        println!("Pruned: {}", tree.pruned);
        println!("Nodes: {}", tree.nodes);
        for (branches, count) in &tree.choice_stats {
            println!("  {branches}: {count}");
        }
        for (i, force) in tree.forces.iter().enumerate() {
            println!(
                "Force {i} ({}, {}): {}",
                force.cell, force.letter, force.score
            );
        }
    }
    Ok(())
}
