//! CLI command implementations

use anyhow::{Context, bail};
use cdsn_core::{CdsnConfig, ConfigLoader, ResultExt, Syntax, Validator, scan};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extension of notation documents found by walking directories
const DOCUMENT_EXTENSION: &str = "cdsn";

/// Format command implementation
///
/// Without `--write` or `--check` the formatted documents go to stdout.
pub fn format_command(
    paths: Vec<PathBuf>,
    write: bool,
    check: bool,
    indent_size: Option<usize>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    debug!("Running format command on paths: {:?}", paths);

    let start_time = Instant::now();
    let files = discover_files(&paths)?;
    let mut config = load_config(config_path.as_deref(), &paths)?;
    if let Some(indent) = indent_size {
        config
            .formatter
            .get_or_insert_with(Default::default)
            .indent_size = Some(indent);
    }
    if files.is_empty() {
        println!("No notation documents found in specified paths.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut formatter = config.formatter();
    let mut failures = 0;
    let mut unformatted = 0;

    for file in &files {
        let source = read_document(file)?;
        let outcome = parse_and_validate(&config, &source)
            .recoverable()
            .with_context(|| format!("Failed to process {}", file.display()))?;
        let formatted = match outcome {
            Ok(syntax) => formatter.format_syntax(&syntax)?,
            Err(e) => {
                report_failure(file, &e);
                failures += 1;
                continue;
            }
        };

        if formatted == source {
            debug!("{} is already canonical", file.display());
            if !write && !check {
                print!("{formatted}");
            }
            continue;
        }

        if check {
            println!("{} {}", "Would reformat:".yellow(), file.display());
            unformatted += 1;
        } else if write {
            std::fs::write(file, &formatted)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            info!("Formatted {}", file.display());
            println!("{} {}", "Formatted:".green(), file.display());
        } else {
            print!("{formatted}");
        }
    }

    debug!(
        "Formatted {} documents in {:?}",
        files.len(),
        start_time.elapsed()
    );

    if check && unformatted == 0 && failures == 0 {
        println!(
            "{} {} documents are formatted correctly",
            "✓".green(),
            files.len()
        );
    }

    if failures > 0 || unformatted > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Validate command implementation
pub fn validate_command(
    paths: Vec<PathBuf>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    debug!("Running validate command on paths: {:?}", paths);

    let files = discover_files(&paths)?;
    let config = load_config(config_path.as_deref(), &paths)?;
    if files.is_empty() {
        println!("No notation documents found in specified paths.");
        return Ok(ExitCode::SUCCESS);
    }

    let mut failures = 0;
    for file in &files {
        let source = read_document(file)?;
        let outcome = parse_and_validate(&config, &source)
            .recoverable()
            .with_context(|| format!("Failed to process {}", file.display()))?;
        match outcome {
            Ok(_) => println!("{} {}", "✓".green(), file.display()),
            Err(e) => {
                report_failure(file, &e);
                failures += 1;
            }
        }
    }

    println!("{} documents checked, {} invalid", files.len(), failures);
    if failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Analyze command implementation
pub fn analyze_command(
    path: PathBuf,
    json: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let source = read_document(&path)?;
    let config = load_config(config_path.as_deref(), std::slice::from_ref(&path))?;
    let syntax = parse_and_validate(&config, &source)
        .with_context(|| format!("{} is not a valid document", path.display()))?;
    let analysis = config.analyzer().analyze_syntax(&syntax)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Syntax:".bold(), analysis.syntax_name());
    println!("\n{}", "Rules:".bold());
    for (rule, attributes) in analysis.references() {
        let attributes: Vec<String> = attributes
            .iter()
            .map(|attribute| {
                let marker = if attribute.is_plural() { "*" } else { "" };
                format!("{}{marker}", attribute.name())
            })
            .collect();
        println!("  {rule}: {}", attributes.join(", "));
    }
    println!("\n{}", "Expressions:".bold());
    for (expression, regex) in analysis.regexes() {
        println!("  {expression}: {regex}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Tokens command implementation
pub fn tokens_command(path: PathBuf) -> anyhow::Result<ExitCode> {
    let source = read_document(&path)?;
    for token in scan(&source)? {
        println!(
            "{:>4}:{:<3} {:<10} {:?}",
            token.line(),
            token.position(),
            token.token_type().name(),
            token.value()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Use `--config` when given, otherwise search upwards from the first path
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> anyhow::Result<CdsnConfig> {
    let start_dir = match paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
        Some(path) => path.as_path(),
        None => Path::new("."),
    };
    let config = ConfigLoader::load(config_path, Some(start_dir))?;
    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Expand directories into the documents below them, sorted by path
fn discover_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|file| {
                    file.extension()
                        .is_some_and(|extension| extension == DOCUMENT_EXTENSION)
                })
                .collect();
            found.sort();
            files.extend(found);
        } else {
            bail!("Path not found: {}", path.display());
        }
    }
    debug!("Found {} documents", files.len());
    Ok(files)
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse_and_validate(config: &CdsnConfig, source: &str) -> cdsn_core::Result<Syntax> {
    let syntax = config.parser().parse_source(source)?;
    Validator::new().validate_syntax(&syntax)?;
    Ok(syntax)
}

fn report_failure(file: &Path, error: &cdsn_core::NotationError) {
    eprintln!("{} {}", "✗".red(), file.display());
    eprintln!("{error}");
}
