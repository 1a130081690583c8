use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::PathBuf,
};

use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, Level};
use wordtrie::{load_into, FileSource, InlineSource, StdinSource, Trie, TrieError, WordSource};

/// Look up words and expand prefixes over a word list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Word list file with whitespace-separated words. May be repeated.
    #[arg(short, long = "words", value_name = "FILE")]
    words: Vec<PathBuf>,
    /// A single word to add alongside the word lists. May be repeated.
    #[arg(long = "word", value_name = "WORD")]
    extra_words: Vec<String>,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether each word is stored.
    Contains {
        #[arg(name = "WORD", required = true)]
        words: Vec<String>,
    },
    /// List every stored word starting with each prefix.
    Get {
        #[arg(name = "PREFIX", required = true)]
        prefixes: Vec<String>,
    },
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
enum QueryResult {
    Contains { query: String, contains: bool },
    Get { prefix: String, words: Vec<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let trie = {
        let start = Instant::now();
        let trie = build_trie(&cli).await?;
        let end = Instant::now();
        debug!("Loading took {} ms", (end - start).as_millis());
        trie
    };

    let results = run_queries(&trie, &cli.command)?;
    let mut stdout = io::stdout().lock();
    if cli.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&results)?)?;
    } else {
        print_results(&mut stdout, &results)?;
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = tracing_subscriber::fmt().with_max_level(level);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            subscriber.with_writer(file).with_ansi(false).init();
        }
        None => subscriber.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

async fn build_trie(cli: &Cli) -> anyhow::Result<Trie> {
    let sources = word_sources(cli, std::io::stdin().is_terminal())?;

    let mut trie = Trie::new();
    for source in &sources {
        load_into(&mut trie, source.as_ref()).await?;
    }
    info!("Trie holds {} words", trie.len());

    Ok(trie)
}

/// Stdin is only read when no files or inline words were given and something
/// is piped in.
fn word_sources(
    cli: &Cli,
    stdin_is_terminal: bool,
) -> anyhow::Result<Vec<Box<dyn WordSource + Send + Sync>>> {
    let mut sources: Vec<Box<dyn WordSource + Send + Sync>> = Vec::new();
    for path in &cli.words {
        sources.push(Box::new(FileSource::new(path)));
    }
    if !cli.extra_words.is_empty() {
        sources.push(Box::new(InlineSource(cli.extra_words.join(" "))));
    }
    if sources.is_empty() {
        if stdin_is_terminal {
            anyhow::bail!("no words to load; pass --words, --word, or pipe a word list on stdin");
        }
        sources.push(Box::new(StdinSource));
    }

    Ok(sources)
}

/// Queries are lowercased the same way loaded words are.
fn run_queries(trie: &Trie, command: &Command) -> Result<Vec<QueryResult>, TrieError> {
    match command {
        Command::Contains { words } => words
            .iter()
            .map(|word| {
                let query = word.to_lowercase();
                let contains = trie.contains(&query)?;
                Ok(QueryResult::Contains { query, contains })
            })
            .collect(),
        Command::Get { prefixes } => prefixes
            .iter()
            .map(|prefix| {
                let prefix = prefix.to_lowercase();
                let words = trie.get(&prefix)?;
                debug!("{} words start with {:?}", words.len(), prefix);
                Ok(QueryResult::Get { prefix, words })
            })
            .collect(),
    }
}

fn print_results(out: &mut impl Write, results: &[QueryResult]) -> io::Result<()> {
    let grouped = results.len() > 1;
    for result in results {
        match result {
            QueryResult::Contains { query, contains } => writeln!(out, "{}: {}", query, contains)?,
            QueryResult::Get { prefix, words } => {
                if grouped {
                    writeln!(out, "{}:", prefix)?;
                }
                for word in words {
                    if grouped {
                        writeln!(out, "  {}", word)?;
                    } else {
                        writeln!(out, "{}", word)?;
                    }
                }
            }
        }
    }
    Ok(())
}
