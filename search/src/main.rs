use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use scour_core::champions::build_champions;
use scour_core::persist::{load_snapshot, IndexPaths};
use scour_core::pipeline::EnglishPipeline;
use scour_core::{RankMode, SearchMode, Searcher, DEFAULT_ALPHA};
use scour_search::{enable_champions, style, Console, ConsoleOptions};
use std::io;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search")]
#[command(about = "Interactive query console over a built index", long_about = None)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Query evaluation mode
    #[arg(long, value_enum, default_value = "tfidf")]
    mode: ModeArg,
    /// How many results to display
    #[arg(long, default_value_t = 5)]
    top_k: usize,
    /// Cosine smoothing constant
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    alpha: f32,
    /// Rebuild the champions list at startup with this per-term postings cap
    #[arg(long)]
    champions_threshold: Option<usize>,
    /// Start with champions-list retrieval enabled
    #[arg(long, default_value_t = false)]
    champions: bool,
    /// Disable colored output
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Tfidf,
    Cosine,
    Boolean,
}

impl From<ModeArg> for SearchMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Tfidf => SearchMode::Ranked(RankMode::TfIdf),
            ModeArg::Cosine => SearchMode::Ranked(RankMode::Cosine),
            ModeArg::Boolean => SearchMode::Boolean,
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let snapshot = load_snapshot(&IndexPaths::new(&args.index))?;
    let searcher = Searcher::with_snapshot(snapshot, Box::new(EnglishPipeline::new()));

    // the full index is the only valid champions input, never a prior list
    if let Some(x) = args.champions_threshold {
        let champions = build_champions(&searcher.snapshot().index, x);
        searcher.store().install_champions(champions);
    }
    if args.champions {
        enable_champions(&searcher)
            .context("pass --champions-threshold or run `indexer champions` first")?;
    }

    let color = !args.no_color && style::stdout_supports_color();
    let snapshot = searcher.snapshot();
    println!(
        "{}",
        style::paint(style::GREEN, "Booting query console...", color)
    );
    println!(
        "{}",
        style::paint(
            style::DIM,
            &format!(
                "{} documents, {} terms; type \\help for commands",
                snapshot.num_docs,
                snapshot.index.num_terms()
            ),
            color
        )
    );
    tracing::info!(
        index = %args.index,
        num_docs = snapshot.num_docs,
        "console ready"
    );

    let opts = ConsoleOptions {
        mode: args.mode.into(),
        top_k: args.top_k,
        alpha: args.alpha,
        color,
    };
    let mut console = Console::new(searcher, opts);
    let stdin = io::stdin();
    let stdout = io::stdout();
    console.run(stdin.lock(), stdout.lock())
}
