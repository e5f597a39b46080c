//! Tinyaml command-line tool for checking and transcoding documents.
//!
//! Usage: tinyaml [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (tinyaml, json, yaml, toml, cbor, diag)
//!                          [default: json]
//!   -w, --write            Write output to file with inferred name
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if file is valid (exit 0 if valid, 1 if invalid)
//!   --strict               Reject lines left over after the root value
//!   --max-depth <N>        Maximum nesting depth
//!   -v, --verbose          Log parser progress to stderr
//!   -h, --help             Print help
//!   -V, --version          Print version

use libtinyaml::{encode, parse_with_options, Format, ParseOptions, Value};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod transcode;

/// Output formats the tool can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Tinyaml,
    Json,
    Yaml,
    Toml,
    Cbor,
    CborDiag,
}

fn parse_target(s: &str) -> Option<Target> {
    match s {
        "tinyaml" | "tiny" => Some(Target::Tinyaml),
        "json" => Some(Target::Json),
        "yaml" | "yml" => Some(Target::Yaml),
        "toml" => Some(Target::Toml),
        "cbor" => Some(Target::Cbor),
        "diag" => Some(Target::CborDiag),
        _ => None,
    }
}

fn target_extension(target: Target) -> &'static str {
    match target {
        Target::Tinyaml => "tiny",
        Target::Json => "json",
        Target::Yaml => "yaml",
        Target::Toml => "toml",
        Target::Cbor => "cbor",
        Target::CborDiag => "diag",
    }
}

/// Settings shared by every input processed in one run.
struct Run<'a> {
    target: Target,
    options: ParseOptions,
    output_file: Option<&'a str>,
    write_back: bool,
    check_only: bool,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut target = Target::Json;
    let mut write_back = false;
    let mut output_file: Option<&str> = None;
    let mut check_only = false;
    let mut verbose = false;
    let mut options = ParseOptions::default();
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("tinyaml {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                target = match parse_target(&args[i]) {
                    Some(t) => t,
                    None => {
                        eprintln!("Error: Unknown format: {}", args[i]);
                        process::exit(1);
                    }
                };
            }
            "-w" | "--write" => {
                write_back = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(args[i].as_str());
            }
            "--check" => {
                check_only = true;
            }
            "--strict" => {
                options = options.reject_trailing_content(true);
            }
            "--max-depth" => {
                i += 1;
                let depth = args.get(i).and_then(|s| s.parse::<usize>().ok());
                match depth {
                    Some(d) if d > 0 => options = options.max_depth(d),
                    _ => {
                        eprintln!("Error: --max-depth requires a positive integer");
                        process::exit(1);
                    }
                }
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(args[i].as_str());
            }
        }
        i += 1;
    }

    init_logging(verbose);

    if write_back && output_file.is_some() {
        eprintln!("Error: --write and --output are mutually exclusive");
        process::exit(1);
    }

    let run = Run {
        target,
        options,
        output_file,
        write_back,
        check_only,
    };

    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            if output_file.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process_directory(path, &run);
            return;
        }
    }

    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    process::exit(process_input(&input, input_path, &run));
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn process_directory(dir_path: &str, run: &Run) {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            process::exit(1);
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "tiny").unwrap_or(false))
        .collect();
    paths.sort();

    info!(dir = dir_path, files = paths.len(), "processing directory");

    let mut had_errors = false;
    for path in paths {
        let path_str = path.to_string_lossy();
        let input = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path_str, e);
                had_errors = true;
                continue;
            }
        };

        if process_input(&input, Some(&*path_str), run) != 0 {
            had_errors = true;
        }
    }

    process::exit(if had_errors { 1 } else { 0 });
}

/// Parse one document and write it out. Returns the exit code.
fn process_input(input: &str, input_file: Option<&str>, run: &Run) -> i32 {
    let mut options = run.options.clone();
    if let Some(path) = input_file {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());
        options = options.filename(name);
    }

    debug!(file = input_file.unwrap_or("<stdin>"), bytes = input.len(), "parsing");

    let value = match parse_with_options(input, &options) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if run.check_only {
        match input_file {
            Some(path) if run.output_file.is_none() => println!("{}: ok", path),
            _ => println!("ok"),
        }
        return 0;
    }

    output_value(&value, run, input_file)
}

fn output_value(value: &Value, run: &Run, input_file: Option<&str>) -> i32 {
    let target = run.target;
    let result = match target {
        Target::Tinyaml => encode(value, Format::Tinyaml)
            .map(Output::Text)
            .map_err(|e| e.to_string()),
        Target::Json => encode(value, Format::Json)
            .map(Output::Text)
            .map_err(|e| e.to_string()),
        Target::Yaml => transcode::yaml::encode(value).map(Output::Text),
        Target::Toml => transcode::toml::encode(value).map(Output::Text),
        Target::Cbor => transcode::cbor::encode(value).map(Output::Binary),
        Target::CborDiag => transcode::cbor::encode(value)
            .and_then(|bytes| transcode::cbor::diagnostic(&bytes))
            .map(Output::Text),
    };

    match result {
        Ok(Output::Text(text)) => write_text_output(&text, run, input_file),
        Ok(Output::Binary(bytes)) => write_binary_output(&bytes, run, input_file),
        Err(e) => {
            eprintln!(
                "Error: Cannot convert to {}: {}",
                target_extension(target),
                e
            );
            return 1;
        }
    }

    0
}

enum Output {
    Text(String),
    Binary(Vec<u8>),
}

/// Destination file for `--output` or `--write`, if any.
fn output_path(run: &Run, input_file: Option<&str>) -> Option<String> {
    if let Some(path) = run.output_file {
        return Some(path.to_string());
    }
    if !run.write_back {
        return None;
    }
    match input_file {
        Some(input_path) => {
            let ext = target_extension(run.target);
            Some(
                Path::new(input_path)
                    .with_extension(ext)
                    .to_string_lossy()
                    .to_string(),
            )
        }
        None => {
            eprintln!("Error: --write requires an input file");
            process::exit(1);
        }
    }
}

fn write_text_output(output: &str, run: &Run, input_file: Option<&str>) {
    if let Some(path) = output_path(run, input_file) {
        if let Err(e) = fs::write(&path, output) {
            eprintln!("Error writing {}: {}", path, e);
            process::exit(1);
        }
    } else {
        print!("{}", output);
        // Ensure output ends with newline
        if !output.ends_with('\n') {
            println!();
        }
    }
}

fn write_binary_output(output: &[u8], run: &Run, input_file: Option<&str>) {
    if let Some(path) = output_path(run, input_file) {
        if let Err(e) = fs::write(&path, output) {
            eprintln!("Error writing {}: {}", path, e);
            process::exit(1);
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = handle.write_all(output) {
            eprintln!("Error writing to stdout: {}", e);
            process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        "tinyaml - tinyaml command-line tool

USAGE:
    tinyaml [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .tiny files in it

OPTIONS:
    -t, --to <FORMAT>      Output format [default: json]
                           Supported: tinyaml, json, yaml, toml, cbor, diag

    -w, --write            Write output to file with inferred extension

    -o, --output <FILE>    Write output to specified file (not valid with directory input)

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    --strict               Reject lines left over after the root value

    --max-depth <N>        Maximum nesting depth [default: {}]

    -v, --verbose          Log parser progress to stderr (RUST_LOG overrides)

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # Convert a document to JSON
    tinyaml config.tiny

    # Validate every .tiny file in a directory
    tinyaml --check ./configs/

    # Convert to YAML, TOML or CBOR
    tinyaml -t yaml config.tiny
    tinyaml -t toml config.tiny -o config.toml
    tinyaml -t cbor config.tiny -o config.cbor

    # View CBOR in diagnostic notation (RFC 8949 §8)
    tinyaml -t diag config.tiny

    # Normalize layout and quoting
    tinyaml -t tinyaml config.tiny
",
        libtinyaml::DEFAULT_MAX_DEPTH
    );
}
