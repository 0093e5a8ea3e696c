//! Command-line front end for pdf-extract-core.
//!
//! Subcommands: `extract`, `info`, `bench`. See spec section 6 for the
//! exact flag set and exit code contract.

use clap::{Parser, Subcommand};
use pdf_extract_core::config::{ExtractionOptions, ReadingOrder};
use pdf_extract_core::document::PdfDocument;
use pdf_extract_core::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "pdf-extract", about = "Extract text from PDF documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract text from a PDF.
    Extract {
        /// Page range: `A`, `A-B`, `A-`, or a comma-separated list. 1-indexed.
        #[arg(short = 'p', long = "pages")]
        pages: Option<String>,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Use structure-tree (tagged) reading order instead of content-stream order.
        #[arg(long)]
        tagged: bool,

        /// Render Markdown instead of plain text.
        #[arg(long)]
        markdown: bool,

        /// Number of worker threads for multi-page extraction.
        #[arg(short = 'j', long = "jobs", default_value_t = 1)]
        jobs: usize,

        /// Input PDF path.
        path: PathBuf,
    },
    /// Print document metadata.
    Info {
        /// Input PDF path.
        path: PathBuf,
    },
    /// Extract every page and report timing.
    Bench {
        /// Input PDF path.
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprint!("{err}");
            return ExitCode::from(4);
        },
    };

    match cli.command {
        Command::Extract {
            pages,
            output,
            tagged,
            markdown,
            jobs,
            path,
        } => run_extract(&path, pages.as_deref(), output.as_deref(), tagged, markdown, jobs.max(1)),
        Command::Info { path } => run_info(&path),
        Command::Bench { path } => run_bench(&path),
    }
}

fn run_extract(
    path: &std::path::Path,
    pages_arg: Option<&str>,
    output: Option<&std::path::Path>,
    tagged: bool,
    markdown: bool,
    jobs: usize,
) -> ExitCode {
    let page_count = match PdfDocument::open(path).and_then(|mut d| d.page_count()) {
        Ok(n) => n,
        Err(err) => return report_error(&err),
    };

    let indices = match pages_arg {
        Some(spec) => match parse_page_ranges(spec, page_count) {
            Ok(v) => v,
            Err(msg) => {
                eprintln!("Error: {msg}");
                return ExitCode::from(4);
            },
        },
        None => (0..page_count).collect(),
    };

    let options = ExtractionOptions::default()
        .with_order(if tagged { ReadingOrder::Tagged } else { ReadingOrder::Stream })
        .with_markdown(markdown)
        .with_parallelism(jobs);

    let texts = match extract_pages(path, &indices, &options, jobs) {
        Ok(v) => v,
        Err(err) => return report_error(&err),
    };

    let combined = texts.join(if markdown { "\n---\n\n" } else { "\x0c" });

    match output {
        Some(out_path) => {
            if let Err(err) = std::fs::write(out_path, combined) {
                eprintln!("Error: {err}");
                return ExitCode::from(2);
            }
        },
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            if lock.write_all(combined.as_bytes()).is_err() {
                return ExitCode::from(2);
            }
        },
    }

    ExitCode::SUCCESS
}

/// Extract `indices` from the document at `path`, fanning out across up to
/// `jobs` worker threads. Each worker opens its own document handle: the
/// core's per-document caches use `RefCell`, so a loaded `PdfDocument` isn't
/// `Sync` and can't be shared by reference across threads.
fn extract_pages(
    path: &std::path::Path,
    indices: &[usize],
    options: &ExtractionOptions,
    jobs: usize,
) -> pdf_extract_core::error::Result<Vec<String>> {
    if jobs <= 1 || indices.len() <= 1 {
        let mut doc = PdfDocument::open(path)?;
        return indices.iter().map(|&i| extract_one(&mut doc, i, options)).collect();
    }

    let chunk_size = indices.len().div_ceil(jobs).max(1);
    let mut results: Vec<Option<String>> = vec![None; indices.len()];

    std::thread::scope(|scope| -> pdf_extract_core::error::Result<()> {
        let mut handles = Vec::new();

        for (chunk_start, chunk) in indices.chunks(chunk_size).enumerate() {
            let offset = chunk_start * chunk_size;
            let chunk = chunk.to_vec();
            let options = options.clone();
            handles.push((
                offset,
                scope.spawn(move || -> pdf_extract_core::error::Result<Vec<String>> {
                    let mut doc = PdfDocument::open(path)?;
                    chunk.iter().map(|&i| extract_one(&mut doc, i, &options)).collect()
                }),
            ));
        }

        for (offset, handle) in handles {
            let texts = handle.join().expect("worker thread panicked")?;
            for (i, text) in texts.into_iter().enumerate() {
                results[offset + i] = Some(text);
            }
        }

        Ok(())
    })?;

    Ok(results.into_iter().map(|r| r.expect("every page index was assigned")).collect())
}

fn extract_one(
    doc: &mut PdfDocument,
    page_index: usize,
    options: &ExtractionOptions,
) -> pdf_extract_core::error::Result<String> {
    let mut buf = Vec::new();
    doc.extract(page_index, &mut buf, options)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn run_info(path: &std::path::Path) -> ExitCode {
    let mut doc = match PdfDocument::open(path) {
        Ok(d) => d,
        Err(err) => return report_error(&err),
    };

    let info = match doc.info() {
        Ok(i) => i,
        Err(err) => return report_error(&err),
    };

    println!("Title:    {}", info.title.as_deref().unwrap_or("-"));
    println!("Author:   {}", info.author.as_deref().unwrap_or("-"));
    println!("Subject:  {}", info.subject.as_deref().unwrap_or("-"));
    println!("Producer: {}", info.producer.as_deref().unwrap_or("-"));
    println!("Pages:    {}", info.page_count);
    println!("Version:  {}.{}", info.version.0, info.version.1);

    ExitCode::SUCCESS
}

fn run_bench(path: &std::path::Path) -> ExitCode {
    let mut doc = match PdfDocument::open(path) {
        Ok(d) => d,
        Err(err) => return report_error(&err),
    };

    let page_count = match doc.page_count() {
        Ok(n) => n,
        Err(err) => return report_error(&err),
    };

    let options = ExtractionOptions::default();
    let start = Instant::now();
    let mut total_bytes = 0usize;

    for i in 0..page_count {
        match extract_one(&mut doc, i, &options) {
            Ok(text) => total_bytes += text.len(),
            Err(err) => return report_error(&err),
        }
    }

    let elapsed = start.elapsed();
    println!("Pages:    {page_count}");
    println!("Bytes:    {total_bytes}");
    println!("Elapsed:  {elapsed:?}");
    if page_count > 0 {
        println!("Per page: {:?}", elapsed / page_count as u32);
    }

    ExitCode::SUCCESS
}

/// Parse a 1-indexed page range spec (`A`, `A-B`, `A-`, comma-separated) into
/// 0-indexed page indices, clamped to `[0, page_count)`.
fn parse_page_ranges(spec: &str, page_count: usize) -> Result<Vec<usize>, String> {
    if page_count == 0 {
        return Ok(Vec::new());
    }

    let mut indices = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (start, end) = match part.split_once('-') {
            None => {
                let n: usize = part.parse().map_err(|_| format!("invalid page number: {part}"))?;
                (n, n)
            },
            Some((a, "")) => {
                let n: usize = a.parse().map_err(|_| format!("invalid page number: {a}"))?;
                (n, page_count)
            },
            Some((a, b)) => {
                let start: usize = a.parse().map_err(|_| format!("invalid page number: {a}"))?;
                let end: usize = b.parse().map_err(|_| format!("invalid page number: {b}"))?;
                (start, end)
            },
        };

        if start == 0 {
            return Err("page numbers are 1-indexed".to_string());
        }

        let start = (start - 1).min(page_count - 1);
        let end = end.min(page_count);

        for i in start..end {
            indices.push(i);
        }
    }

    Ok(indices)
}

fn report_error(err: &Error) -> ExitCode {
    eprintln!("Error: {err}");
    match err {
        Error::Io(_) => ExitCode::from(2),
        _ => ExitCode::from(3),
    }
}
