//! sff-migrate — schema migration shell for EMDB-SFF segmentation documents.
//!
//! One-shot mode only: read a document, migrate it to the requested (or
//! newest) schema version, write the result next to the input. Migration
//! failures leave the output file unwritten and exit non-zero.

mod commands;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};

use sff_core::{Result, Version, VersionList};
use sff_document::{parse_document, source_version, write_document};
use sff_engine::{HandlerRegistry, MigrationPipeline, MigrationReport, ParameterSource, Params};

use commands::build_cli;

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if matches.get_flag("show-versions") {
        for version in VersionList::default().versions() {
            println!("{}", version);
        }
        return;
    }

    if let Err(message) = run(&matches) {
        eprintln!("sff-migrate: {}", message);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(matches: &clap::ArgMatches) -> std::result::Result<(), String> {
    let versions = VersionList::default();

    // `infile` is required unless --show-versions, which exits earlier.
    let infile = matches
        .get_one::<String>("infile")
        .map(PathBuf::from)
        .ok_or_else(|| "no input file given".to_string())?;

    let target = match matches.get_one::<String>("target-version") {
        Some(token) => Version::new(token.as_str()),
        None => versions
            .latest()
            .cloned()
            .ok_or_else(|| "no schema versions configured".to_string())?,
    };

    let xml = fs::read_to_string(&infile)
        .map_err(|e| format!("cannot read {}: {}", infile.display(), e))?;
    let document = parse_document(&xml)
        .map_err(|e| format!("cannot parse {}: {}", infile.display(), e))?;
    let source = source_version(&document)
        .map_err(|e| format!("cannot determine version of {}: {}", infile.display(), e))?;

    let outfile = match matches.get_one::<String>("outfile") {
        Some(path) => PathBuf::from(path),
        None => default_output_path(&infile, &target),
    };

    let pipeline = MigrationPipeline::new(versions, HandlerRegistry::builtin());
    let report = pipeline
        .run(document, &source, &target, &PromptParams)
        .map_err(|e| e.to_string())?;

    // The pipeline's warn! event already covers the quiet path.
    if matches.get_flag("verbose") {
        for line in dropped_field_warnings(&report) {
            eprintln!("{}", line);
        }
    }

    let rendered = write_document(&report.document);
    fs::write(&outfile, rendered)
        .map_err(|e| format!("cannot write {}: {}", outfile.display(), e))?;

    if matches.get_flag("verbose") {
        eprintln!("{} -> {} ({})", source, target, outfile.display());
    }
    Ok(())
}

/// One warning line per step that dropped fields; clean steps are silent.
fn dropped_field_warnings(report: &MigrationReport) -> Vec<String> {
    report
        .steps
        .iter()
        .filter(|s| !s.dropped.is_empty())
        .map(|s| format!("warning: step {} dropped fields: {}", s.step, s.dropped))
        .collect()
}

/// `<stem>_<target>.<ext>` alongside the input file.
fn default_output_path(input: &Path, target: &Version) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("segmentation");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, target, ext),
        None => format!("{}_{}", stem, target),
    };
    input.with_file_name(name)
}

/// Interactive parameter source
///
/// Prompts on stderr and reads one line from stdin per declared parameter,
/// in declaration order.
struct PromptParams;

impl ParameterSource for PromptParams {
    fn resolve(&self, declared: &[String]) -> Result<Params> {
        let stdin = io::stdin();
        let mut params = Params::new();
        for name in declared {
            eprint!("{}: ", name);
            io::stderr().flush()?;
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            params.insert(
                name.clone(),
                line.trim_end_matches(&['\r', '\n'][..]).to_string(),
            );
        }
        Ok(params)
    }
}
