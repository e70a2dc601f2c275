use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use env_logger::Env;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::path::PathBuf;

use swagger_combine::{
    load_documents, writer, LoadOptions, MergeOptions, Merger, OutputFormat, WriteOptions,
};

/// Combine Swagger 2.0 documents: the first file is the base, the others are merged into it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base document followed by one or more overlay documents (JSON or YAML)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Remove the base document's basePath from overlay path keys
    #[arg(
        long = "stripBasePath",
        value_name = "BOOL",
        action = ArgAction::Set,
        default_value_t = false
    )]
    strip_base_path: bool,

    /// Output file
    #[arg(short, long, default_value = writer::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Output format (inferred from the output file extension by default)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write JSON without pretty-printing
    #[arg(long)]
    compact: bool,

    /// Fail on unknown top-level fields instead of dropping them
    #[arg(long)]
    strict: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Split `--key[=value]` tokens whose key the CLI does not define out of
/// the argument list; they are accepted and ignored.
fn split_unknown_options(args: Vec<OsString>) -> (Vec<OsString>, Vec<String>) {
    let command = Cli::command();
    let mut known: Vec<&str> = command.get_arguments().filter_map(|arg| arg.get_long()).collect();
    known.extend(["help", "version"]);

    let mut kept = Vec::with_capacity(args.len());
    let mut ignored = Vec::new();
    for (index, arg) in args.into_iter().enumerate() {
        let unknown = match arg.to_str() {
            Some(token) if index > 0 && token.len() > 2 => token
                .strip_prefix("--")
                .filter(|option| {
                    let key = option.split('=').next().unwrap_or_default();
                    !known.contains(&key)
                })
                .map(str::to_string),
            _ => None,
        };
        match unknown {
            Some(option) => ignored.push(option),
            None => kept.push(arg),
        }
    }
    (kept, ignored)
}

fn main() -> Result<()> {
    let (args, ignored) = split_unknown_options(std::env::args_os().collect());
    let cli = Cli::parse_from(args);

    if cli.files.len() < 2 {
        println!("usage: swagger-combine base.json swagger2.json swagger3.json");
        println!("Please use at least two input files");
        std::process::exit(1);
    }

    let env = Env::default().filter_or("RUST_LOG", if cli.verbose { "debug" } else { "info" });
    env_logger::init_from_env(env);

    debug!("Starting swagger-combine...");
    for option in &ignored {
        warn!("Ignoring unknown option: --{}", option);
    }

    let load_options = LoadOptions {
        tolerate_unknown_fields: !cli.strict,
    };
    let merge_options = MergeOptions {
        strip_base_path: cli.strip_base_path,
    };
    let write_options = WriteOptions {
        format: cli
            .format
            .unwrap_or_else(|| OutputFormat::from_path(&cli.output)),
        pretty: !cli.compact,
    };
    debug!("Options: {:?} {:?} {:?}", load_options, merge_options, write_options);

    let mut documents = load_documents(&cli.files, &load_options)
        .context("Failed to load input documents")?
        .into_iter();
    let base = documents
        .next()
        .context("No base document was loaded")?;

    info!("Merging {} overlays into {:?}", cli.files.len() - 1, cli.files[0]);
    let combined = Merger::new(merge_options).merge(base, documents);

    swagger_combine::write_document(&combined, &cli.output, &write_options)
        .with_context(|| format!("Failed to write output: {:?}", cli.output))?;

    println!("Done.");
    Ok(())
}
