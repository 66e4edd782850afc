// ABOUTME: CLI that builds the ReaWrap function catalog from REAPER's ReaScript reference page.
// ABOUTME: Loads the page from a URL, file or stdin and writes the namespace catalog as JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use reawrap_api::{build_catalog, CatalogOptions, RuleSet};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Build the ReaWrap function catalog from reascripthelp.html and output JSON.
#[derive(Parser, Debug)]
#[command(name = "reawrap-cli")]
#[command(about = "Parse the ReaScript API reference into a namespace catalog", long_about = None)]
struct Args {
    /// Reference page URL (http/https) or local file path. Use "-" to read from stdin.
    target: String,

    /// JSON rule set replacing the built-in one.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Also include the built-in Lua functions section.
    #[arg(long, default_value_t = false)]
    builtins: bool,

    /// Write the catalog to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Log pipeline details.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => RuleSet::builtin(),
    };

    let bytes = load_bytes(&args.target)?;
    let html = String::from_utf8_lossy(&bytes);
    debug!(target = %args.target, bytes = bytes.len(), "loaded reference page");

    let options = CatalogOptions {
        include_builtins: args.builtins,
    };
    let catalog = build_catalog(&html, &rules, &options)
        .with_context(|| format!("failed to build catalog from {}", args.target))?;

    let json = if args.compact {
        serde_json::to_string(&catalog)?
    } else {
        serde_json::to_string_pretty(&catalog)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), namespaces = catalog.len(), "wrote catalog");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn load_rules(path: &Path) -> Result<RuleSet> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read rules {}", path.display()))?;
    Ok(RuleSet::from_json(&text)?)
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    if target.starts_with("http://") || target.starts_with("https://") {
        let resp = reqwest::blocking::get(target)?.error_for_status()?;
        let bytes = resp.bytes()?;
        return Ok(bytes.to_vec());
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
