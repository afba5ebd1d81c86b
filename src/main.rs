//! acl-stash - hide a payload file inside carrier-file ACLs.
//!
//! Thin shell over the encoder facade: argument parsing, confirmation
//! prompts, and report printing live here; all channel logic is in the
//! library.

use acl_stash::config::{DEFAULT_MAX_ACL_ENTRIES, DEFAULT_SUBJECT_TAG};
use acl_stash::{AclEncoder, ChannelConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::PathBuf;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "acl-stash")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Hide a payload file inside carrier-file ACL entries",
    long_about = "Stores payload bytes as tagged synthetic entries in the POSIX ACLs of a manifest-ordered set of carrier files. Carrier contents are never modified."
)]
struct Cli {
    /// Assumed ACL entry-count limit per carrier file
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ACL_ENTRIES)]
    max_acl_entries: usize,

    /// Tag byte marking synthetic entries (128-254)
    #[arg(long, global = true, default_value_t = DEFAULT_SUBJECT_TAG)]
    tag: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a carrier manifest from the files under a directory
    Scan {
        /// Directory to walk for carrier files
        dir: PathBuf,

        /// Manifest file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show per-carrier and total capacity for a manifest
    Info {
        /// Manifest listing carrier file paths, one per line
        manifest: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hide a payload file inside the carriers' ACLs
    Encode {
        /// Manifest listing carrier file paths, one per line
        manifest: PathBuf,

        /// Payload file to hide
        payload: PathBuf,
    },

    /// Recover the hidden payload into a file
    Decode {
        /// Manifest listing carrier file paths, one per line
        manifest: PathBuf,

        /// Output file for the recovered payload
        output: PathBuf,

        /// Overwrite the output file without asking
        #[arg(long)]
        force: bool,
    },

    /// Remove all hidden entries, restoring clean carrier ACLs
    Strip {
        /// Manifest listing carrier file paths, one per line
        manifest: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ChannelConfig::new(cli.tag, cli.max_acl_entries);
    match cli.command {
        Commands::Scan { dir, output } => cmd_scan(&dir, &output),
        Commands::Info { manifest, json } => cmd_info(&manifest, config, json),
        Commands::Encode { manifest, payload } => cmd_encode(&manifest, &payload, config),
        Commands::Decode {
            manifest,
            output,
            force,
        } => cmd_decode(&manifest, &output, config, force),
        Commands::Strip { manifest, force } => cmd_strip(&manifest, config, force),
    }
}

fn confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().eq_ignore_ascii_case("y")
}

fn digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn cmd_scan(dir: &PathBuf, output: &PathBuf) -> Result<()> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        // Skip hidden files
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with('.') {
                continue;
            }
        }
        paths.push(path.to_path_buf());
    }
    paths.sort();

    let mut lines = String::new();
    for path in &paths {
        lines.push_str(&path.display().to_string());
        lines.push('\n');
    }
    std::fs::write(output, lines)
        .with_context(|| format!("writing manifest {}", output.display()))?;

    println!("Wrote {} carrier paths to {}", paths.len(), output.display());
    Ok(())
}

#[derive(Serialize)]
struct CarrierReport {
    path: PathBuf,
    capacity_bytes: u64,
}

#[derive(Serialize)]
struct ChannelReport {
    manifest: PathBuf,
    carriers: Vec<CarrierReport>,
    total_capacity_bytes: u64,
}

fn cmd_info(manifest: &PathBuf, config: ChannelConfig, json: bool) -> Result<()> {
    let encoder = AclEncoder::load(manifest, config).context("loading file list")?;
    let list = encoder.file_list();

    let report = ChannelReport {
        manifest: manifest.clone(),
        carriers: list
            .carriers()
            .iter()
            .map(|c| CarrierReport {
                path: c.path.clone(),
                capacity_bytes: c.capacity_bytes,
            })
            .collect(),
        total_capacity_bytes: list.total_capacity(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Carrier capacity");
        println!("================");
        for carrier in &report.carriers {
            println!("{:>8} B  {}", carrier.capacity_bytes, carrier.path.display());
        }
        println!();
        println!("Total: {} bytes across {} carriers", report.total_capacity_bytes, report.carriers.len());
    }

    Ok(())
}

fn cmd_encode(manifest: &PathBuf, payload: &PathBuf, config: ChannelConfig) -> Result<()> {
    let mut encoder = AclEncoder::load(manifest, config).context("loading file list")?;
    let written = encoder.encode(payload).context("encoding payload")?;

    let data = std::fs::read(payload)?;
    println!(
        "Encoded {} bytes into {} carrier files (sha256 {})",
        written,
        encoder.file_list().len(),
        digest(&data)
    );
    Ok(())
}

fn cmd_decode(manifest: &PathBuf, output: &PathBuf, config: ChannelConfig, force: bool) -> Result<()> {
    if output.exists() && !force {
        if !confirm(&format!(
            "Output file {} already exists. Overwrite it with the decoded payload?",
            output.display()
        )) {
            println!("Aborted");
            return Ok(());
        }
    }

    let encoder = AclEncoder::load(manifest, config).context("loading file list")?;
    let recovered = encoder.decode(output).context("decoding payload")?;

    let data = std::fs::read(output)?;
    println!(
        "Decoded {} bytes to {} (sha256 {})",
        recovered,
        output.display(),
        digest(&data)
    );
    Ok(())
}

fn cmd_strip(manifest: &PathBuf, config: ChannelConfig, force: bool) -> Result<()> {
    if !force
        && !confirm("This will remove all hidden ACL entries from the carrier files. Continue?")
    {
        println!("Aborted");
        return Ok(());
    }

    let mut encoder = AclEncoder::load(manifest, config).context("loading file list")?;
    encoder.remove_encoded().context("removing hidden entries")?;

    println!(
        "Removed hidden entries from {} carrier files",
        encoder.file_list().len()
    );
    Ok(())
}
