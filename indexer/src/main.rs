use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use scour_core::build::{build_index, build_positional};
use scour_core::champions::build_champions;
use scour_core::persist::{
    load_index, load_meta, save_champions, save_index, save_meta, save_positional, save_refined,
    BuildMeta, IndexPaths, INDEX_VERSION,
};
use scour_core::pipeline::EnglishPipeline;
use scour_core::prune::prune_top_terms;
use scour_core::Corpus;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and manage inverted index artifacts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a collection JSON file or a directory of them
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Also build the positional index
        #[arg(long, default_value_t = false)]
        positional: bool,
        /// Also build a champions list with this per-term postings cap
        #[arg(long)]
        champions: Option<usize>,
    },
    /// Remove the highest-document-frequency terms from a built index
    Prune {
        /// Index directory produced by `build`
        #[arg(long)]
        index_dir: String,
        /// How many terms to remove
        #[arg(long)]
        top: usize,
    },
    /// Build or rebuild the champions list from the full index
    Champions {
        /// Index directory produced by `build`
        #[arg(long)]
        index_dir: String,
        /// Per-term postings cap
        #[arg(long)]
        threshold: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            positional,
            champions,
        } => build(&input, &output, positional, champions),
        Commands::Prune { index_dir, top } => prune(&index_dir, top),
        Commands::Champions {
            index_dir,
            threshold,
        } => champions(&index_dir, threshold),
    }
}

fn build(input: &str, output: &str, positional: bool, champions: Option<usize>) -> Result<()> {
    let files = collect_collection_files(Path::new(input));
    ensure!(!files.is_empty(), "no collection files found under {input}");

    let corpus = Corpus::load_merged(&files)?;
    tracing::info!(num_docs = corpus.len(), files = files.len(), "loaded collection");

    let pipeline = EnglishPipeline::new();
    let out = build_index(&corpus, &pipeline);
    let paths = IndexPaths::new(output);

    save_index(&paths, &out.index)?;
    save_refined(&paths, &out.refined)?;
    if positional {
        save_positional(&paths, &build_positional(&corpus, &pipeline))?;
    }
    if let Some(x) = champions {
        if x == 0 {
            tracing::warn!("champions threshold 0 empties every frequent term's postings");
        }
        save_champions(&paths, &build_champions(&out.index, x))?;
    }
    remove_stale_artifacts(&paths, positional, champions.is_some())?;
    publish_meta(&paths, corpus.len(), out.index.num_terms())?;

    tracing::info!(output, num_terms = out.index.num_terms(), "index build complete");
    Ok(())
}

fn prune(index_dir: &str, top: usize) -> Result<()> {
    let paths = IndexPaths::new(index_dir);
    let meta = load_meta(&paths).context("no index available (run `indexer build` first)")?;
    let index = load_index(&paths)?;

    let pruned = prune_top_terms(&index, top);
    tracing::info!(
        removed = index.num_terms() - pruned.num_terms(),
        remaining = pruned.num_terms(),
        "pruned high-frequency terms"
    );
    save_index(&paths, &pruned)?;

    // the positional index still describes the corpus; the champions list
    // described the unpruned index
    remove_stale_artifacts(&paths, true, false)?;
    publish_meta(&paths, meta.num_docs, pruned.num_terms())?;
    Ok(())
}

fn champions(index_dir: &str, threshold: usize) -> Result<()> {
    let paths = IndexPaths::new(index_dir);
    load_meta(&paths).context("no index available (run `indexer build` first)")?;
    let index = load_index(&paths)?;

    if threshold == 0 {
        tracing::warn!("champions threshold 0 empties every frequent term's postings");
    }
    let champions = build_champions(&index, threshold);
    save_champions(&paths, &champions)?;
    tracing::info!(threshold, num_terms = champions.num_terms(), "champions list written");
    Ok(())
}

/// Delete optional artifacts that were not rebuilt on this run; left behind,
/// they would describe a previous index. The loader refuses a champions list
/// that disagrees with the index, so a surviving stale file would turn every
/// reload into an error.
fn remove_stale_artifacts(
    paths: &IndexPaths,
    rebuilt_positional: bool,
    rebuilt_champions: bool,
) -> Result<()> {
    if !rebuilt_positional && paths.positional().exists() {
        fs::remove_file(paths.positional())
            .with_context(|| format!("removing {}", paths.positional().display()))?;
        tracing::warn!("removed stale positional index from a previous build");
    }
    if !rebuilt_champions && paths.champions().exists() {
        fs::remove_file(paths.champions())
            .with_context(|| format!("removing {}", paths.champions().display()))?;
        tracing::warn!("removed stale champions list; rebuild it with `indexer champions`");
    }
    Ok(())
}

// meta.json goes last: it is the publish marker the loader requires
fn publish_meta(paths: &IndexPaths, num_docs: usize, num_terms: usize) -> Result<()> {
    let meta = BuildMeta {
        num_docs,
        num_terms,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: INDEX_VERSION,
    };
    save_meta(paths, &meta)
}

fn collect_collection_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}
