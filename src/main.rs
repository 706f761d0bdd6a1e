//! loglight - print a log file with its highlighters applied

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;

use loglight::display::Printer;
use loglight::{Config, HighlightError, Result, RuleSetCollection};

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    extra_sets: Vec<String>,
    list: bool,
    no_color: bool,
    file: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args)? {
        Some(options) => options,
        None => return Ok(()),
    };

    let config = match &options.config {
        Some(path) => Config::with_path(path),
        None => Config::from_default_location()?,
    };
    log::debug!("settings file {}", config.path().display());

    let mut collection = config.load_highlighters()?;

    if options.list {
        list_sets(&collection);
        return Ok(());
    }

    for wanted in &options.extra_sets {
        activate_for_run(&mut collection, wanted)?;
    }

    let stdout = io::stdout();
    let mut printer = Printer::new(stdout.lock(), !options.no_color);

    match &options.file {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    HighlightError::Message(format!("File not found: {}", path.display()))
                }
                _ => HighlightError::Io(e),
            })?;
            highlight_stream(BufReader::new(file), &mut collection, &mut printer)?;
        }
        _ => highlight_stream(io::stdin().lock(), &mut collection, &mut printer)?,
    }

    printer.flush()
}

/// Parse arguments; `None` means the request was fully handled (help, version)
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                println!("loglight {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| HighlightError::Message(format!("{} needs a path", arg)))?;
                options.config = Some(PathBuf::from(path));
            }
            "--set" | "-s" => {
                let set = iter.next().ok_or_else(|| {
                    HighlightError::Message(format!("{} needs a set name or id", arg))
                })?;
                options.extra_sets.push(set.clone());
            }
            "--list" => options.list = true,
            "--no-color" => options.no_color = true,
            other if other.starts_with('-') && other != "-" => {
                return Err(HighlightError::Message(format!("Unknown option: {}", other)));
            }
            file => {
                if options.file.is_some() {
                    return Err(HighlightError::Message(
                        "Only one file can be highlighted".to_string(),
                    ));
                }
                options.file = Some(PathBuf::from(file));
            }
        }
    }

    Ok(Some(options))
}

/// Activate a set by id or name without saving the change
fn activate_for_run(collection: &mut RuleSetCollection, wanted: &str) -> Result<()> {
    let id = collection
        .get_set(wanted)
        .or_else(|| collection.find_set_by_name(wanted))
        .map(|set| set.id().to_string())
        .ok_or_else(|| HighlightError::NoSuchSet(wanted.to_string()))?;

    if !collection.activate_set(&id) {
        log::debug!("set {} was already active", id);
    }
    Ok(())
}

fn highlight_stream<R: BufRead, W: io::Write>(
    mut reader: R,
    collection: &mut RuleSetCollection,
    printer: &mut Printer<W>,
) -> Result<()> {
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        while matches!(raw.last(), Some(b'\n' | b'\r')) {
            raw.pop();
        }

        let line = String::from_utf8_lossy(&raw);
        let (kind, ranges) = collection.match_line(&line);
        printer.print_line(&line, kind, &ranges)?;
    }
    Ok(())
}

fn list_sets(collection: &RuleSetCollection) {
    for set in collection.sets() {
        let marker = if collection.is_active(set.id()) { '*' } else { ' ' };
        println!("{} {}  {} ({} highlighters)", marker, set.id(), set.name(), set.len());
    }
}

fn print_usage() {
    println!("loglight {} - log highlighter", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: loglight [OPTIONS] [FILE]");
    println!();
    println!("Reads standard input when FILE is omitted or '-'.");
    println!();
    println!("Options:");
    println!("  -c, --config PATH   Settings file (default ~/.loglight.toml)");
    println!("  -s, --set SET       Also activate SET (name or id) for this run");
    println!("      --list          List highlighter sets and exit");
    println!("      --no-color      Tag lines with their match kind instead of colouring");
    println!("  -h, --help          Show this help message");
    println!("  -V, --version       Show version information");
    println!();
    println!("Set RUST_LOG=debug for diagnostics.");
}
