/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Render a template file against a JSON or YAML data file
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use undertemplate::{Matcher, Template};

mod input;

#[derive(Parser, Debug)]
#[command(name = "undertemplate")]
#[command(version, about = "Render a template against a JSON or YAML data file")]
struct Args {
    /// Template file to render
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Data context (.json, .yaml or .yml); defaults to an empty context
    #[arg(short = 'd', long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// TOML file overriding directive patterns
    #[arg(short = 's', long, value_name = "FILE")]
    syntax: Option<PathBuf>,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only compile the template and report structural errors
    #[arg(long)]
    check: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "undertemplate=warn",
        1 => "undertemplate=info",
        _ => "undertemplate=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = fs::read_to_string(&args.template)
        .context(format!("Failed to read template: {:?}", args.template))?;
    let syntax = input::load_syntax(args.syntax.as_deref())?;
    let matcher = Matcher::new(&syntax)
        .map_err(|e| anyhow::anyhow!("{}", input::describe_error(&args.template, &source, &e)))?;

    let template = Template::compile_with_matcher(&source, &matcher)
        .map_err(|e| anyhow::anyhow!("{}", input::describe_error(&args.template, &source, &e)))?;
    tracing::info!(template = ?args.template, parts = template.parts().len(), "compiled");

    if args.check {
        eprintln!("{}: ok", args.template.display());
        return Ok(());
    }

    let context = input::load_context(args.data.as_deref())?;
    tracing::info!(variables = context.len(), "loaded data context");

    let output = template.render(&context);

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create output directory: {:?}", parent))?;
            }
            fs::write(path, &output).context(format!("Failed to write output file: {:?}", path))?;
            tracing::info!(output = ?path, bytes = output.len(), "wrote output");
        }
        None => print!("{}", output),
    }

    Ok(())
}
