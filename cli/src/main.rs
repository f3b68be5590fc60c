//! pdf2docx CLI - rebuild PDF text as Word documents

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

use pdf2docx::render::{to_json, to_text};
use pdf2docx::{
    convert_batch_with_progress, ConvertOptions, ConverterRegistry, DocxOptions, JsonFormat,
    Pdf2Docx, ReconstructOptions,
};

#[derive(Parser)]
#[command(name = "pdf2docx")]
#[command(version)]
#[command(about = "Rebuild PDF text as styled Word documents", long_about = None)]
struct Cli {
    /// Input file (PDF or pdf2json output)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags shared by every command that reconstructs text.
#[derive(clap::Args, Clone, Default)]
struct ReconstructArgs {
    /// Fail on malformed fragments instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Rebuild lines from fragment positions
    #[arg(long)]
    layout: bool,

    /// JSON config file with "reconstruct" and "docx" sections
    #[arg(long, value_name = "FILE", env = "PDF2DOCX_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one file to a Word document
    Convert {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <stem>_converted.docx)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ReconstructArgs,
    },

    /// Convert several files in parallel
    Batch {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ReconstructArgs,
    },

    /// Print the reconstructed text
    Text {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        args: ReconstructArgs,
    },

    /// Print the paragraph descriptors as JSON
    Json {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        args: ReconstructArgs,
    },

    /// Show document information
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Contents of a `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    reconstruct: ReconstructOptions,
    docx: DocxOptions,
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            args,
        }) => cmd_convert(&input, output.as_deref(), &args),
        Some(Commands::Batch {
            inputs,
            output,
            args,
        }) => cmd_batch(&inputs, output.as_deref(), &args),
        Some(Commands::Text {
            input,
            output,
            args,
        }) => cmd_text(&input, output.as_deref(), &args),
        Some(Commands::Json {
            input,
            output,
            compact,
            args,
        }) => cmd_json(&input, output.as_deref(), compact, &args),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), &ReconstructArgs::default())
            } else {
                println!("{}", "Usage: pdf2docx <FILE> [OUTPUT]".yellow());
                println!("       pdf2docx --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: &Path) -> CliResult<ConfigFile> {
    let data = fs::read_to_string(path)?;
    let config = serde_json::from_str(&data)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

fn build_options(args: &ReconstructArgs) -> CliResult<ConvertOptions> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ConfigFile::default(),
    };

    let mut reconstruct = config.reconstruct;
    if args.layout {
        reconstruct = reconstruct.positional();
    }

    let mut options = ConvertOptions::new()
        .with_error_mode(reconstruct.error_mode)
        .with_reconstruct_options(reconstruct)
        .with_docx_options(config.docx);
    if args.strict {
        options = options.strict();
    }
    Ok(options)
}

fn builder(args: &ReconstructArgs) -> CliResult<Pdf2Docx> {
    Ok(Pdf2Docx::from_options(build_options(args)?))
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(input: &Path, output: Option<&Path>, args: &ReconstructArgs) -> CliResult {
    let options = build_options(args)?;
    let result = ConverterRegistry::global().convert(input, &options)?;

    let output_path = output.map(Path::to_path_buf).unwrap_or_else(|| {
        input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&result.file_name)
    });
    fs::write(&output_path, &result.docx)?;

    println!("{} {}", "Saved to".green(), output_path.display());
    println!(
        "  {} {} pages, {} paragraphs ({} headings)",
        "├─".dimmed(),
        result.details.pages_processed,
        result.details.paragraph_count,
        result.details.heading_count
    );
    if result.details.skipped_fragments > 0 {
        println!(
            "  {} {} fragments skipped",
            "├─".dimmed(),
            result.details.skipped_fragments.to_string().yellow()
        );
    }
    println!("  {} {} bytes", "└─".dimmed(), result.file_size());

    Ok(())
}

fn cmd_batch(inputs: &[PathBuf], output: Option<&Path>, args: &ReconstructArgs) -> CliResult {
    let options = build_options(args)?;
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Converting...");
    let results = convert_batch_with_progress(inputs, &options, |_, _| pb.inc(1));

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(converted) => {
                let target = output_dir.join(&converted.file_name);
                fs::write(&target, &converted.docx)?;
                pb.println(format!("{} {}", "Converted".green(), target.display()));
            }
            Err(e) => {
                failed += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), path.display(), e));
            }
        }
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} converted, {} failed",
        "Batch complete:".green().bold(),
        inputs.len() - failed,
        failed
    );

    if failed > 0 {
        return Err(format!("{} of {} files failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>, args: &ReconstructArgs) -> CliResult {
    let reconstruction = builder(args)?.reconstruct_file(input)?;
    write_or_print(output, &to_text(&reconstruction.paragraphs))
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    args: &ReconstructArgs,
) -> CliResult {
    let reconstruction = builder(args)?.reconstruct_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = to_json(&reconstruction, format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path) -> CliResult {
    let doc = pdf2docx::parse_file(input)?;
    let format = pdf2docx::detect_format_from_path(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Pages".bold(), doc.page_count());

    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = doc.metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = doc.metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Fragments".bold(), doc.fragment_count());

    match pdf2docx::Reconstructor::default().reconstruct_document(&doc) {
        Ok(reconstruction) => {
            let words = reconstruction.text.split_whitespace().count();
            println!("{}: {}", "Words".bold(), words);
            println!(
                "{}: {}",
                "Characters".bold(),
                reconstruction.text.chars().count()
            );
            println!(
                "{}: {}",
                "Paragraphs".bold(),
                reconstruction.text_paragraph_count()
            );
            println!("{}: {}", "Headings".bold(), reconstruction.heading_count());
        }
        Err(e) => println!("{}: {}", "Text".bold(), e.to_string().yellow()),
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2docx".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF text to Word document converter");
    println!();
    let mut extensions = ConverterRegistry::global().supported_extensions();
    extensions.sort_unstable();
    println!("Supported inputs: {}", extensions.join(", "));
    println!("License: MIT");
}
