//! Interactive query console over a built index. All I/O goes through the
//! generic reader/writer pair so the loop is scriptable in tests.

use anyhow::{ensure, Result};
use scour_core::{DocId, RankMode, SearchMode, SearchOptions, SearchResults, Searcher, Snapshot};
use std::io::{BufRead, Write};

pub mod style {
    //! Plain ANSI styling, gated on a caller-supplied switch.

    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";

    /// Wrap `text` in a color code when enabled, return it plain otherwise.
    pub fn paint(code: &str, text: &str, enabled: bool) -> String {
        if enabled {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Respects the NO_COLOR convention, then falls back to TTY detection.
    pub fn stdout_supports_color() -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }
        atty::is(atty::Stream::Stdout)
    }
}

/// One line of console input, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Exit,
    Clear,
    Help,
    History,
    SetMode(SearchMode),
    SetChampions(bool),
    Malformed(String),
    Query(String),
}

/// Classify a console line. `exit` is case-insensitive and `clear`/`cls` both
/// clear, matching the historical console; everything else starting with a
/// backslash is a command, and any remaining line is a query.
pub fn parse_command(line: &str) -> ConsoleCommand {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        return ConsoleCommand::Exit;
    }
    if trimmed == "clear" || trimmed == "cls" {
        return ConsoleCommand::Clear;
    }
    if let Some(rest) = trimmed.strip_prefix('\\') {
        let mut parts = rest.split_whitespace();
        return match parts.next() {
            Some("help") => ConsoleCommand::Help,
            Some("history") => ConsoleCommand::History,
            Some("mode") => match parts.next() {
                Some("tfidf") => ConsoleCommand::SetMode(SearchMode::Ranked(RankMode::TfIdf)),
                Some("cosine") => ConsoleCommand::SetMode(SearchMode::Ranked(RankMode::Cosine)),
                Some("boolean") => ConsoleCommand::SetMode(SearchMode::Boolean),
                _ => ConsoleCommand::Malformed("usage: \\mode tfidf|cosine|boolean".into()),
            },
            Some("champions") => match parts.next() {
                Some("on") => ConsoleCommand::SetChampions(true),
                Some("off") => ConsoleCommand::SetChampions(false),
                _ => ConsoleCommand::Malformed("usage: \\champions on|off".into()),
            },
            _ => ConsoleCommand::Malformed(format!(
                "unknown command \\{rest}; type \\help for the list"
            )),
        };
    }
    ConsoleCommand::Query(trimmed.to_string())
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleOptions {
    pub mode: SearchMode,
    /// How many hits to display, clamped to at least 1 on construction; the
    /// engine always returns the full list.
    pub top_k: usize,
    pub alpha: f32,
    pub color: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Ranked(RankMode::TfIdf),
            top_k: 5,
            alpha: scour_core::DEFAULT_ALPHA,
            color: false,
        }
    }
}

/// Turn on champions-list retrieval, refusing when the snapshot has no list
/// installed; the switch would otherwise silently read the full index.
pub fn enable_champions(searcher: &Searcher) -> Result<()> {
    ensure!(
        searcher.snapshot().champions.is_some(),
        "no champions list loaded"
    );
    searcher.store().set_champions_enabled(true);
    Ok(())
}

pub struct Console {
    searcher: Searcher,
    opts: ConsoleOptions,
    history: Vec<String>,
}

impl Console {
    pub fn new(searcher: Searcher, opts: ConsoleOptions) -> Self {
        Self {
            searcher,
            opts: ConsoleOptions {
                top_k: opts.top_k.max(1),
                ..opts
            },
            history: Vec::new(),
        }
    }

    /// Prompt/evaluate loop. Ends on `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        loop {
            write!(
                out,
                "{}",
                style::paint(style::BLUE, "Insert query: ", self.opts.color)
            )?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            match parse_command(&line) {
                ConsoleCommand::Exit => break,
                ConsoleCommand::Clear => {
                    if self.opts.color {
                        write!(out, "\x1b[2J\x1b[H")?;
                    }
                }
                ConsoleCommand::Help => print_help(&mut out)?,
                ConsoleCommand::History => self.print_history(&mut out)?,
                ConsoleCommand::SetMode(mode) => {
                    self.opts.mode = mode;
                    writeln!(out, "mode set to {}", mode_name(mode))?;
                }
                ConsoleCommand::SetChampions(on) => self.set_champions(on, &mut out)?,
                ConsoleCommand::Malformed(msg) => {
                    writeln!(out, "{}", style::paint(style::RED, &msg, self.opts.color))?;
                }
                ConsoleCommand::Query(q) => {
                    self.history.push(q.clone());
                    let results = self.searcher.search(
                        &q,
                        &SearchOptions {
                            mode: self.opts.mode,
                            alpha: self.opts.alpha,
                        },
                    );
                    self.render(&results, &mut out)?;
                }
            }
        }
        Ok(())
    }

    fn set_champions<W: Write>(&self, on: bool, out: &mut W) -> Result<()> {
        if on {
            if let Err(err) = enable_champions(&self.searcher) {
                writeln!(
                    out,
                    "{}",
                    style::paint(style::RED, &err.to_string(), self.opts.color)
                )?;
                return Ok(());
            }
        } else {
            self.searcher.store().set_champions_enabled(false);
        }
        writeln!(
            out,
            "champions list {}",
            if on { "enabled" } else { "disabled" }
        )?;
        Ok(())
    }

    fn print_history<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.history.is_empty() {
            writeln!(out, "no queries yet")?;
            return Ok(());
        }
        for (i, q) in self.history.iter().enumerate() {
            writeln!(out, "{:>3}  {}", i + 1, q)?;
        }
        Ok(())
    }

    fn render<W: Write>(&self, results: &SearchResults, out: &mut W) -> Result<()> {
        if results.is_empty() {
            writeln!(
                out,
                "{}",
                style::paint(style::RED, "No result found", self.opts.color)
            )?;
            return Ok(());
        }
        let snapshot = self.searcher.snapshot();
        match results {
            SearchResults::Ranked(hits) => {
                for (i, hit) in hits.iter().take(self.opts.top_k).enumerate() {
                    self.render_hit(i + 1, hit.doc_id, Some(hit.score), &snapshot, out)?;
                }
            }
            SearchResults::Boolean(ids) => {
                for (i, &doc_id) in ids.iter().take(self.opts.top_k).enumerate() {
                    self.render_hit(i + 1, doc_id, None, &snapshot, out)?;
                }
            }
        }
        Ok(())
    }

    fn render_hit<W: Write>(
        &self,
        rank: usize,
        doc_id: DocId,
        score: Option<f32>,
        snapshot: &Snapshot,
        out: &mut W,
    ) -> Result<()> {
        let doc = match snapshot.refined.get(&doc_id) {
            Some(doc) => doc,
            None => {
                tracing::warn!(doc_id, "posting refers to a missing refined entry");
                return Ok(());
            }
        };
        let color = self.opts.color;
        writeln!(
            out,
            "{}",
            style::paint(
                style::YELLOW,
                &format!("Result {rank} -> {}", doc.title),
                color
            )
        )?;
        let detail = match score {
            Some(score) => format!("  (doc {doc_id}, score {score:.4})"),
            None => format!("  (doc {doc_id})"),
        };
        writeln!(out, "{}", style::paint(style::DIM, &detail, color))?;
        writeln!(
            out,
            "{}",
            style::paint(style::GREEN, &format!("  {}", doc.content), color)
        )?;
        writeln!(
            out,
            "{}",
            style::paint(style::DIM, &format!("  {}", doc.url), color)
        )?;
        Ok(())
    }
}

fn print_help<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "exit                 quit the console")?;
    writeln!(out, "clear, cls           clear the screen")?;
    writeln!(out, "\\mode MODE           switch evaluation: tfidf, cosine, boolean")?;
    writeln!(out, "\\champions on|off    read from the champions list or the full index")?;
    writeln!(out, "\\history             show past queries")?;
    writeln!(out, "\\help                show this message")?;
    Ok(())
}

fn mode_name(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Ranked(RankMode::TfIdf) => "tfidf",
        SearchMode::Ranked(RankMode::Cosine) => "cosine",
        SearchMode::Boolean => "boolean",
    }
}
