//! unone CLI - OneNote section export tool

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unone::discover::{discover_notebooks, section_name_from_path};
use unone::parser::parse_sections;
use unone::{
    ExportOptions, Exporter, JsonDumpDecoder, JsonFormat, Notebook, PageSelection, ParseOptions,
    RenderOptions, Section, SectionParser,
};

#[derive(Parser)]
#[command(name = "unone")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Export OneNote sections to Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging (very verbose)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every notebook under a directory to Markdown files
    Export {
        /// Input directory containing section files
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,

        /// Output directory for Markdown files
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        /// Output flat directory structure (no notebook subdirectories)
        #[arg(long)]
        flat: bool,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,
    },

    /// Convert a section to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input section file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Convert a section to plain text
    Text {
        /// Input section file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Convert a section to JSON
    Json {
        /// Input section file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show section information
    Info {
        /// Input section file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// A command failure with its process exit code.
struct Failure {
    code: u8,
    message: String,
}

impl<E: std::fmt::Display> From<E> for Failure {
    fn from(err: E) -> Self {
        Failure {
            code: 1,
            message: err.to_string(),
        }
    }
}

type CmdResult = Result<(), Failure>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let result = match cli.command {
        Commands::Export {
            input,
            output,
            flat,
            frontmatter,
        } => cmd_export(&input, &output, flat, frontmatter),
        Commands::Markdown {
            input,
            output,
            frontmatter,
            pages,
        } => cmd_markdown(&input, output.as_deref(), frontmatter, pages.as_deref()),
        Commands::Text {
            input,
            output,
            pages,
        } => cmd_text(&input, output.as_deref(), pages.as_deref()),
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), compact),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("{}: {}", "Error".red().bold(), failure.message);
            ExitCode::from(failure.code)
        }
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn page_selection(pages: Option<&str>) -> Result<PageSelection, Failure> {
    match pages {
        Some(p) => PageSelection::parse(p)
            .map_err(|e| Failure::from(format!("Invalid page range: {}", e))),
        None => Ok(PageSelection::All),
    }
}

fn load_section(input: &Path) -> Result<Section, Failure> {
    Ok(SectionParser::open(input)?.parse())
}

fn write_or_print(output: Option<&Path>, content: &str) -> CmdResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_export(input: &Path, output: &Path, flat: bool, frontmatter: bool) -> CmdResult {
    if !input.is_dir() {
        return Err(format!("Input directory does not exist: {}", input.display()).into());
    }

    let notebooks = discover_notebooks(input)?;
    let file_count: usize = notebooks.iter().map(|n| n.files.len()).sum();
    if file_count == 0 {
        return Err(format!("No section files found in {}", input.display()).into());
    }
    println!(
        "Found {} section file(s) in {}",
        file_count.to_string().cyan(),
        input.display()
    );

    let pb = ProgressBar::new(file_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| e.to_string())?
            .progress_chars("#>-"),
    );

    let parse_options = ParseOptions::new().lenient();
    let exporter = Exporter::new(
        output,
        ExportOptions::new()
            .with_flat(flat)
            .with_render_options(RenderOptions::new().with_frontmatter(frontmatter)),
    );
    let decoder = JsonDumpDecoder::new();

    let mut total_pages = 0;
    let mut total_files = 0;
    let mut errors: Vec<String> = Vec::new();

    for sources in &notebooks {
        pb.set_message(sources.name.clone());
        let outcome = parse_sections(&sources.files, &parse_options, &decoder)?;
        pb.inc(sources.files.len() as u64);

        for (path, err) in &outcome.failures {
            errors.push(format!("{}: {}", path.display(), err));
        }

        let mut notebook = Notebook::new(&sources.name);
        notebook.dir_path = Some(sources.dir.clone());
        for mut section in outcome.sections {
            if let Some(path) = section.file_path.clone() {
                section.name = section_name_from_path(&path);
            }
            total_pages += section.page_count();
            notebook.add_section(section);
        }

        if notebook.is_empty() {
            continue;
        }
        match exporter.export_notebook(&notebook) {
            Ok(files) => total_files += files.len(),
            Err(e) => errors.push(format!("writing notebook {}: {}", notebook.name, e)),
        }
    }
    pb.finish_and_clear();

    println!("\n{}", "Export complete:".green().bold());
    println!("  {} Pages extracted: {}", "├─".dimmed(), total_pages);
    println!("  {} Files written:   {}", "├─".dimmed(), total_files);
    println!("  {} Output:          {}", "└─".dimmed(), output.display());

    if !errors.is_empty() {
        eprintln!("\n{} ({}):", "Errors".red().bold(), errors.len());
        for err in &errors {
            eprintln!("  {}", err);
        }
        if total_files == 0 {
            return Err(Failure {
                code: 2,
                message: "every section failed".to_string(),
            });
        }
    }

    Ok(())
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    pages: Option<&str>,
) -> CmdResult {
    let render_options = RenderOptions::new()
        .with_frontmatter(frontmatter)
        .with_pages(page_selection(pages)?);

    let section = load_section(input)?;
    let markdown = unone::render::to_markdown(&section, &render_options)?;
    write_or_print(output, &markdown)
}

fn cmd_text(input: &Path, output: Option<&Path>, pages: Option<&str>) -> CmdResult {
    let render_options = RenderOptions::new().with_pages(page_selection(pages)?);

    let section = load_section(input)?;
    let text = unone::render::to_text(&section, &render_options)?;
    write_or_print(output, &text)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool) -> CmdResult {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let section = load_section(input)?;
    let json = unone::render::to_json(&section, format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path) -> CmdResult {
    let format = unone::detect_format_from_path(input)?;
    let section = load_section(input)?;

    println!("{}", "Section Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Name".bold(), section.name);
    println!("{}: {}", "Pages".bold(), section.page_count());

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (i, page) in section.pages.iter().enumerate() {
        let indent = "  ".repeat(page.level as usize);
        println!("{:>3}. {}{}", i + 1, indent, page.title);
        if let Some(ref author) = page.author {
            println!("     {} {}", "Author:".dimmed(), author);
        }
        if let Some(ref modified) = page.last_modified {
            println!("     {} {}", "Modified:".dimmed(), modified);
        }
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = section.plain_text();
    let images: usize = section.pages.iter().map(|p| p.images().len()).sum();
    let attachments: usize = section.pages.iter().map(|p| p.embedded_files().len()).sum();
    let tables: usize = section
        .pages
        .iter()
        .flat_map(|p| p.elements.iter())
        .filter(|e| e.is_table())
        .count();

    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Tables".bold(), tables);
    println!("{}: {}", "Images".bold(), images);
    println!("{}: {}", "Attachments".bold(), attachments);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unone".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OneNote section export tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unone".dimmed());
    println!("License: MIT");
}
