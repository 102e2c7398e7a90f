use std::path::PathBuf;
use std::process;

use clap::Parser;
use dict_pager::dict::loader::parse_spec;
use dict_pager::{PagerConfig, Session};
use log::LevelFilter;

/// Look up a headword and print the rendered entries page by page.
#[derive(Parser, Debug)]
#[command(name = "dict-pager", version)]
struct Args {
    /// Archives as `name=base` or `base` (base path without extension)
    #[arg(required = true)]
    archives: Vec<String>,

    /// Headword to look up
    #[arg(short, long)]
    query: String,

    /// Number of further pages to print after the first
    #[arg(long, default_value_t = 0)]
    more: usize,

    /// Only show exact (or pattern) matches, never nearby entries
    #[arg(long)]
    strict: bool,

    /// Treat the query as a regular expression
    #[arg(long)]
    regex: bool,

    /// Compare diacritics and case as written
    #[arg(long)]
    no_normalize: bool,

    /// Output width in columns
    #[arg(long)]
    width: Option<usize>,

    /// Display units per page
    #[arg(long)]
    lines: Option<usize>,

    /// Configuration file of `key = value` options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report where this term occurs on the first page
    #[arg(long)]
    highlight: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let specs: Vec<_> = args.archives.iter().map(|a| parse_spec(a)).collect();
    let mut session = match Session::open(&specs, config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("ERROR: No dictionary could be opened");
            eprintln!("  {}", e);
            process::exit(1);
        }
    };
    for (name, e) in session.failed() {
        eprintln!("WARNING: Skipping '{}': {}", name, e);
    }

    println!("Dictionary: {}", session.selected().title());
    let page_lines = session.config().page_lines as isize;
    match session.search(&args.query) {
        Some(page) => print_page(&page),
        None => {
            println!("No match for '{}'", args.query);
            return;
        }
    }

    if let Some(term) = &args.highlight {
        let spans = session.search_visible(term, session.modes().regex);
        println!("{}", "=".repeat(40));
        println!("{} occurrence(s) of '{}':", spans.len(), term);
        for span in spans {
            println!("  line {}: columns {}..{}", span.line, span.start, span.end);
        }
    }

    for _ in 0..args.more {
        match session.scroll(page_lines, 0) {
            Some(page) => print_page(&page),
            None => break,
        }
    }
}

fn build_config(args: &Args) -> dict_pager::Result<PagerConfig> {
    let mut config = match &args.config {
        Some(path) => PagerConfig::load(path)?,
        None => PagerConfig::default(),
    };
    if let Some(width) = args.width {
        config.layout.width = width;
    }
    if let Some(lines) = args.lines {
        config.page_lines = lines;
    }
    config.modes.strict |= args.strict;
    config.modes.regex |= args.regex;
    if args.no_normalize {
        config.modes.normalize = false;
    }
    config.validate()?;
    Ok(config)
}

fn print_page(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
