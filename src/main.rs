//! # Snipmark - Workers JavaScript Highlighter
//!
//! Highlights JavaScript written for the Workers platform into HTML markup
//! and reports simple statistics about it.
//!
//! ## Quick Start
//!
//! ```bash
//! # Highlight a file to stdout
//! cargo run -- highlight worker.js
//!
//! # Write a standalone page
//! cargo run -- highlight worker.js --format page -o worker.html
//!
//! # Re-render a page every time the file is saved
//! cargo run -- watch worker.js -o worker.html
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snipmark_core::{Config, DebouncedHighlighter, FileWatcher};
use snipmark_highlight::{render_page, Highlighted, Highlighter, Vocabulary};

/// Snipmark - highlight Workers JavaScript
#[derive(Parser, Debug)]
#[command(name = "snipmark")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Highlight a file (or stdin)
    Highlight {
        /// Source file; stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Markup)]
        format: Format,

        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Print line, character, keyword and function-call counts
    Stats {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Re-render a page whenever a file changes
    Watch {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page to write
        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Markup fragment only
    Markup,
    /// Standalone HTML page with stylesheet and statistics
    Page,
    /// JSON object with markup and statistics
    Json,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Snipmark v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    let vocabulary = config.vocabulary().context("Invalid vocabulary in config")?;

    match args.command {
        Command::Highlight {
            file,
            format,
            output,
        } => {
            let source = read_source(file.as_deref())?;
            let result = Highlighter::new(&vocabulary).highlight(&source);
            let rendered = format_result(&result, format, &config.render.title)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Command::Stats { file } => {
            let source = read_source(file.as_deref())?;
            let result = Highlighter::new(&vocabulary).highlight(&source);
            println!("{}", result.stats);
        }
        Command::Watch { file, output } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch(file, output, Arc::new(vocabulary), &config))?;
        }
    }

    Ok(())
}

fn read_source(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}

fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}

fn format_result(result: &Highlighted, format: Format, title: &str) -> anyhow::Result<String> {
    Ok(match format {
        Format::Markup => result.markup.clone(),
        Format::Page => render_page(&result.markup, &result.stats, title),
        Format::Json => serde_json::to_string_pretty(result)?,
    })
}

/// Renders `file` into `output` now and after every debounced change.
async fn watch(
    file: PathBuf,
    output: PathBuf,
    vocabulary: Arc<Vocabulary>,
    config: &Config,
) -> anyhow::Result<()> {
    let (_watcher, mut changes) = FileWatcher::start(&file)?;
    let mut debouncer = DebouncedHighlighter::spawn(vocabulary, config.debounce());

    debouncer.submit_now(tokio::fs::read_to_string(&file).await?);

    loop {
        tokio::select! {
            changed = changes.recv() => {
                let Some(path) = changed else { break };
                match tokio::fs::read_to_string(&path).await {
                    Ok(source) => {
                        debouncer.submit(source);
                    }
                    Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
                }
            }
            rendered = debouncer.next() => {
                let Some(rendered) = rendered else { break };
                let page = render_page(&rendered.result.markup, &rendered.result.stats, &config.render.title);
                tokio::fs::write(&output, page).await?;
                tracing::info!("{} ({})", output.display(), rendered.result.stats);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_highlight_defaults() {
        let args = Args::parse_from(["snipmark", "highlight"]);
        assert_eq!(args.verbose, 0);
        match args.command {
            Command::Highlight {
                file,
                format,
                output,
            } => {
                assert!(file.is_none());
                assert_eq!(format, Format::Markup);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_with_file_and_format() {
        let args = Args::parse_from([
            "snipmark", "-vv", "highlight", "worker.js", "--format", "page", "-o", "out.html",
        ]);
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Highlight {
                file,
                format,
                output,
            } => {
                assert_eq!(file, Some(PathBuf::from("worker.js")));
                assert_eq!(format, Format::Page);
                assert_eq!(output, Some(PathBuf::from("out.html")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_watch_requires_output() {
        assert!(Args::try_parse_from(["snipmark", "watch", "worker.js"]).is_err());
        let args =
            Args::try_parse_from(["snipmark", "watch", "worker.js", "-o", "w.html", "-c", "c.toml"])
                .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_format_result() {
        let result = snipmark_highlight::highlight("let x = 1;");
        assert_eq!(
            format_result(&result, Format::Markup, "t").unwrap(),
            result.markup
        );

        let page = format_result(&result, Format::Page, "t").unwrap();
        assert!(page.contains("<title>t</title>"));

        let json: serde_json::Value =
            serde_json::from_str(&format_result(&result, Format::Json, "t").unwrap()).unwrap();
        assert_eq!(json["stats"]["keywordCount"], 1);
    }
}
