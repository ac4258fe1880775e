use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod commands;

use commands::{
    add::add_file,
    cat::{cat_file, cat_manifest},
    inspect::{inspect_archive, print_archive_report},
    repack::repack,
};

#[derive(Parser)]
#[command(name = "gusezip")]
#[command(about = "Inspect and edit gUSE workflow zip archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decode/encode details
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the base directory, manifest size and every node with its files
    Inspect {
        /// Workflow zip
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Write one node script to stdout
    Cat {
        /// Workflow zip
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Node (job) name
        #[arg(short, long)]
        node: String,
        /// Script file name inside the node directory
        #[arg(short, long)]
        file: String,
        /// Output path (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write workflow.xml to stdout
    Manifest {
        /// Workflow zip
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Output path (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Add or replace a script on an existing node
    Add {
        /// Workflow zip
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Node (job) name, must already exist in the archive
        #[arg(short, long)]
        node: String,
        /// Script file name inside the node directory
        #[arg(short, long)]
        file: String,
        /// Local file whose contents become the script
        #[arg(long)]
        from: PathBuf,
        /// Output zip (defaults to rewriting FILE in place)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Decode and re-encode an archive in canonical entry order
    Repack {
        /// Workflow zip
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Output zip
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    // stdout carries script and manifest bytes
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { input } => inspect_archive(&input).map(|r| print_archive_report(&r)),
        Commands::Cat {
            input,
            node,
            file,
            out,
        } => cat_file(&input, &node, &file, out.as_deref()),
        Commands::Manifest { input, out } => cat_manifest(&input, out.as_deref()),
        Commands::Add {
            input,
            node,
            file,
            from,
            out,
        } => add_file(&input, &node, &file, &from, out.as_deref()),
        Commands::Repack { input, out } => repack(&input, &out),
    }
}
