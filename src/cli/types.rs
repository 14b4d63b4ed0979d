//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ragchat")]
#[command(about = "ragchat - Retrieval-augmented chatbot backend", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ./ragchat.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the query HTTP service
    Serve(ServeArgs),

    /// Index a directory of PDFs into the vector index
    Ingest(IngestArgs),

    /// Show index and configuration status
    Status,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct IngestArgs {
    /// Directory containing the PDFs
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Index directory to write
    #[arg(short, long)]
    pub index: Option<PathBuf>,

    /// Drop the existing index before writing
    #[arg(long)]
    pub reset: bool,
}
