//! xlsx2xml CLI - Excel worksheet to XML conversion tool
//!
//! Converts the first worksheet of an XLSX workbook into a flat XML document.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use xlsx2xml::{Converter, Progress, Stage, XmlOptions, OUTPUT_FILE_NAME};

/// Excel worksheet to flat XML conversion
#[derive(Parser)]
#[command(
    name = "xlsx2xml",
    author = "iyulab",
    version,
    about = "Convert the first worksheet of an Excel workbook to XML",
    long_about = "xlsx2xml - Excel worksheet to XML conversion tool.\n\n\
                  Reads the first sheet of an XLSX workbook and writes it as\n\
                  <root><row><column0>…</column0></row></root>."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a workbook to XML
    Convert {
        /// Input workbook path
        input: PathBuf,

        /// Output file path ("-" for stdout)
        #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
        output: PathBuf,

        /// Output compact XML (no indentation)
        #[arg(long)]
        compact: bool,

        /// Spaces per indentation level
        #[arg(long, default_value = "2")]
        indent: usize,

        /// Omit the <?xml?> declaration
        #[arg(long)]
        no_declaration: bool,
    },

    /// Print the first sheet's cell grid as JSON
    Grid {
        /// Input workbook path
        input: PathBuf,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show workbook information
    Info {
        /// Input workbook path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("xlsx2xml=debug")
            .with_writer(io::stderr)
            .init();
    }

    if let Err(e) = run(cli.command) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Convert {
            input,
            output,
            compact,
            indent,
            no_declaration,
        } => {
            let options = XmlOptions::new()
                .with_pretty(!compact)
                .with_indent(indent)
                .with_declaration(!no_declaration);

            let pb = create_spinner("Reading workbook...");
            let conversion = Converter::new()
                .with_options(options)
                .with_progress(|p| report_progress(&pb, p))
                .convert_file(&input);
            pb.finish_and_clear();
            let conversion = conversion?;

            write_output(&output, &conversion.xml)?;

            if !is_stdout(&output) {
                println!(
                    "{} Converted {} rows to XML: {}",
                    "✓".green().bold(),
                    conversion.rows,
                    output.display()
                );
            }
        }

        Commands::Grid { input, compact } => {
            let pb = create_spinner("Reading workbook...");
            let data = fs::read(&input)?;
            let grid = xlsx2xml::load_grid(&data);
            pb.finish_and_clear();

            let json = grid?.to_json(!compact)?;
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing workbook...");
            let format = xlsx2xml::detect_format_from_path(&input)?;
            let workbook = xlsx2xml::xlsx::Workbook::open(&input)?;
            let grid = workbook.first_sheet();
            pb.finish_and_clear();
            let grid = grid?;

            println!("{}", "Workbook Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Format".bold(), format);
            println!("{}: {}", "Sheets".bold(), workbook.sheet_names().join(", "));

            println!("\n{}", "First Sheet".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "Name".bold(),
                workbook.first_sheet_name().unwrap_or("-")
            );
            println!("{}: {}", "Rows".bold(), grid.row_count());
            println!("{}: {}", "Widest row".bold(), grid.max_columns());
            println!("{}: {}", "Cells".bold(), grid.cell_count());
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn report_progress(pb: &ProgressBar, progress: Progress) {
    match progress.stage {
        Stage::Transforming => pb.set_message(format!(
            "{}... {}/{}",
            progress.stage.label(),
            progress.completed,
            progress.total
        )),
        Stage::Done => pb.set_message(format!("{} ({} bytes)", progress.stage.label(), progress.total)),
        stage => pb.set_message(format!("{}...", stage.label())),
    }
}

fn print_version() {
    println!("{} {}", "xlsx2xml".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Excel worksheet to flat XML conversion");
    println!();
    println!("Supported formats: XLSX, XLSM, XLTX");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn write_output(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if is_stdout(path) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(content.as_bytes())?;
    } else {
        fs::write(path, content)?;
    }
    Ok(())
}
