//! book-index CLI: e-book to paragraph/chapter index converter.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::Result;

use book_index::assemble::{read_index, write_index};
use book_index::config::IndexConfig;
use book_index::container::{self, Container};
use book_index::navigate::{
    Position, chapter_for_paragraph, paragraph_at, percent_complete, word_at,
};
use book_index::pipeline::build_index;
use book_index::text::slugify;
use book_index::toc::{TocIndex, TocTarget};

#[derive(Parser)]
#[command(name = "book-index", version, about = "E-book to paragraph/chapter index converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a book and write the JSON record.
    Build {
        /// Path to the .epub file.
        book: PathBuf,

        /// Output file (default: public/books/<id>.json).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Book id (default: slug of the title, then the file stem).
        #[arg(long)]
        id: Option<String>,

        /// TOML file with indexing options.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print the flattened table of contents and the reading order.
    Toc {
        /// Path to the .epub file.
        book: PathBuf,
    },

    /// Show where a reading position falls in a built index.
    Locate {
        /// Path to a JSON index written by `build`.
        index: PathBuf,

        /// Paragraph id.
        #[arg(long)]
        paragraph: usize,

        /// Word index inside the paragraph.
        #[arg(long, default_value = "0")]
        word: usize,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            book,
            out,
            id,
            config,
            pretty,
        } => {
            let config = match config {
                Some(path) => IndexConfig::load(&path)?,
                None => IndexConfig::default(),
            };
            let mut container = container::open(&book)?;
            let id = id.unwrap_or_else(|| default_book_id(container.as_ref(), &book));
            let out =
                out.unwrap_or_else(|| PathBuf::from("public/books").join(format!("{id}.json")));

            let outcome = build_index(container.as_mut(), &id, &config)?;
            write_index(&outcome.index, &out, pretty)?;

            let report = &outcome.report;
            println!("Wrote {}", out.display());
            println!("  title:      {}", outcome.index.title);
            if let Some(author) = &outcome.index.author {
                println!("  author:     {author}");
            }
            println!("  paragraphs: {}", report.paragraphs);
            println!("  chapters:   {} ({})", report.chapters, report.tier);
            println!("  toc:        {} entries", report.toc_entries);
            println!("  words:      {}", outcome.index.total_words);
            if report.skipped_documents > 0 {
                println!(
                    "  skipped:    {} of {} documents",
                    report.skipped_documents, report.documents
                );
            }
        }

        Commands::Toc { book } => {
            let container = container::open(&book)?;
            let toc = TocIndex::build(container.toc());

            println!("Table of contents ({} entries):", toc.expected_entries());
            for entry in toc.entries() {
                let target = match &entry.target {
                    TocTarget::Anchored { file, anchor } => format!("{file}#{anchor}"),
                    TocTarget::Document { file } => file.clone(),
                    TocTarget::Internal { id } => format!("id:{id}"),
                    TocTarget::Untargeted => "-".to_string(),
                };
                println!("  {:>4}  {}  -> {target}", entry.order, entry.title);
            }

            println!("Reading order ({} documents):", container.flow().len());
            for (position, item) in container.flow().iter().enumerate() {
                println!(
                    "  {position:>4}  {}  {}  {}",
                    item.id,
                    item.path.as_deref().unwrap_or("-"),
                    item.title.as_deref().unwrap_or(""),
                );
            }
        }

        Commands::Locate {
            index,
            paragraph,
            word,
        } => {
            let index = read_index(&index)?;
            let found = paragraph_at(&index, paragraph)?;
            let position = Position::new(paragraph, word);

            match chapter_for_paragraph(&index, paragraph) {
                Some(chapter) => println!("Chapter {}: {}", chapter.index, chapter.title),
                None => println!("Chapter: (none)"),
            }
            println!("Progress: {}%", percent_complete(&index, position));
            match word_at(&index, position) {
                Some(w) => println!("Word: {w}"),
                None => println!("Word: (past end of paragraph)"),
            }
            println!("Paragraph {}: {}", found.id, found.text);
        }
    }

    Ok(())
}

/// Slug of the book title, or of the file stem when the title is missing
/// or slugs to nothing.
fn default_book_id(container: &dyn Container, path: &Path) -> String {
    container
        .metadata()
        .title
        .as_deref()
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let slug = slugify(&stem);
            if slug.is_empty() { "book".to_string() } else { slug }
        })
}
