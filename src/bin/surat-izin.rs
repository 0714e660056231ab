//! # surat-izin CLI
//!
//! Command-line interface for generating leave letters from the Word
//! template.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use surat_izin::letter::{
    GeneratorConfig, LeaveRequest, LibreOfficeConverter, Placeholder, generate, generate_batch,
};
use surat_izin::ooxml::docx::{Package, replace};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "surat-izin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Values that override the configuration file
#[derive(clap::Args, Debug, Clone)]
struct Overrides {
    /// Template .docx file
    #[arg(long)]
    template: Option<PathBuf>,

    /// Directory for generated letters
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Font size of filled-in text, in points
    #[arg(long)]
    font_size: Option<u32>,
}

impl Overrides {
    fn apply(self, config: &mut GeneratorConfig) {
        if let Some(template) = self.template {
            config.template = template;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(font_size) = self.font_size {
            config.font_size = font_size;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one letter from a request file
    Generate {
        /// Request file (YAML or JSON)
        #[arg(long)]
        request: PathBuf,

        #[command(flatten)]
        overrides: Overrides,

        /// Also convert the letter to PDF
        #[arg(long)]
        pdf: bool,
    },

    /// Generate letters for many request files in parallel
    Batch {
        /// Request files (YAML or JSON)
        #[arg(required = true)]
        requests: Vec<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Report where each placeholder occurs in the template
    Check {
        /// Template .docx file
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(rust_log.as_deref(), cli.verbose))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    match cli.command {
        Commands::Generate {
            request,
            overrides,
            pdf,
        } => {
            overrides.apply(&mut config);
            run_generate(&config, &request, pdf)
        },
        Commands::Batch { requests, overrides } => {
            overrides.apply(&mut config);
            Ok(run_batch(&config, &requests))
        },
        Commands::Check { template } => {
            let template = template.unwrap_or(config.template);
            run_check(&template)
        },
    }
}

/// `RUST_LOG` when it is set and parses; otherwise `info`, or `debug` with
/// `--verbose`.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn run_generate(config: &GeneratorConfig, request: &Path, pdf: bool) -> anyhow::Result<ExitCode> {
    let request = LeaveRequest::load(request)?;
    let mut letter = generate(config, &request)?;
    println!("{}", letter.path.display());

    if pdf {
        let program = config.pdf.clone().unwrap_or_default().program;
        let converter = LibreOfficeConverter::new(program);
        let pdf = letter.convert(&converter)?;
        println!("{}", pdf.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_batch(config: &GeneratorConfig, paths: &[PathBuf]) -> ExitCode {
    let mut failed = 0usize;
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        match LeaveRequest::load(path) {
            Ok(request) => loaded.push((path, request)),
            Err(e) => {
                failed += 1;
                println!("FAILED  {}: {}", path.display(), e);
            },
        }
    }

    let requests: Vec<_> = loaded.iter().map(|(_, request)| request.clone()).collect();
    let results = generate_batch(config, &requests);
    for ((path, _), result) in loaded.iter().zip(results) {
        match result {
            Ok(letter) => match &letter.pdf {
                Some(pdf) => println!("OK      {} -> {} ({})", path.display(), letter.path.display(), pdf.display()),
                None => println!("OK      {} -> {}", path.display(), letter.path.display()),
            },
            Err(e) => {
                failed += 1;
                println!("FAILED  {}: {}", path.display(), e);
            },
        }
    }

    if failed > 0 {
        eprintln!("{} of {} requests failed", failed, paths.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_check(template: &Path) -> anyhow::Result<ExitCode> {
    let package = Package::open(template).with_context(|| format!("loading {}", template.display()))?;
    let document = package.document()?;

    let mut missing = 0usize;
    println!("{:<20} {:>6} {:>6}", "placeholder", "runs", "split");
    for placeholder in Placeholder::ALL {
        let location = replace::locate(&document, placeholder.token())?;
        let status = if !location.is_replaceable() {
            missing += 1;
            "  not replaceable"
        } else if location.split_matches > 0 {
            "  partly split"
        } else {
            ""
        };
        println!(
            "{:<20} {:>6} {:>6}{}",
            placeholder.token(),
            location.run_matches,
            location.split_matches,
            status
        );
    }

    if missing > 0 {
        eprintln!("{} placeholders cannot be filled", missing);
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_rust_log_takes_precedence() {
        assert_eq!(log_filter(Some("warn"), false).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("warn"), true).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("trace"), false).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_default_levels() {
        assert_eq!(log_filter(None, false).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(Some(""), true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["surat-izin", "-v", "check", "--template", "t.docx"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check { template: Some(ref t) } if t == Path::new("t.docx")));
    }
}
