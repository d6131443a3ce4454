//! Defines the command-line interface structure using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prompt-library",
    version,
    about = "Categorized AI prompt templates with placeholder customization"
)]
pub struct Cli {
    /// Use a running prompt library API instead of local files
    #[arg(long, global = true, env = "PROMPT_LIBRARY_API_URL")]
    pub api_url: Option<String>,
    /// Directory of the local store (defaults to ~/.prompt-library/data)
    #[arg(long, global = true, env = "PROMPT_LIBRARY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Alternative config file (defaults to ~/.prompt-library/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Serve the REST API over the local store
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:8787
        #[arg(long)]
        bind: Option<String>,
        /// Keep data in memory only (nothing is written to disk)
        #[arg(long)]
        memory: bool,
    },
    /// List categories and their prompts
    List {
        #[arg(long, help = "Only show prompts of this category")]
        category: Option<String>,
    },
    /// Show every detail of a prompt
    Get { id: String },
    /// Create a new prompt
    New {
        #[arg(long, help = "Category to file the prompt under")]
        category: Option<String>,
    },
    /// Edit an existing prompt
    Edit { id: String },
    /// Delete a prompt by ID
    Delete {
        id: String,
        #[arg(long, short, help = "Skip the confirmation")]
        yes: bool,
    },
    /// Move a prompt to another category
    Move {
        id: String,
        #[arg(long, help = "Target category ID")]
        to: String,
    },
    /// Fill in a prompt's fields and print the final text
    Customize {
        id: String,
        #[arg(long = "var", help = "Field values in key=value format")]
        vars: Vec<String>,
        #[arg(long, help = "Copy the result to the clipboard")]
        copy: bool,
    },
    /// Print a shareable link to a prompt
    Share {
        id: String,
        #[arg(long, help = "Action hint: view, edit or customize")]
        action: Option<String>,
        #[arg(long, help = "Include the prompt's category in the link")]
        with_category: bool,
        #[arg(long, help = "Base URL of the library front-end")]
        base: Option<String>,
    },
    /// Resolve a shared link or URL fragment and show the prompt
    Open { location: String },
    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCmd),
    /// Export all categories and prompts to a JSON file
    Export {
        #[arg(long, help = "Output file path")]
        out: PathBuf,
    },
    /// Import categories and prompts from a JSON export
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum CategoryCmd {
    /// Create a category
    New {
        name: String,
        #[arg(long, default_value = "")]
        purpose: String,
    },
    /// List categories with their prompt counts
    List,
    /// Rename a category or change its purpose
    Rename {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        purpose: Option<String>,
    },
    /// Delete a category and delete or move its prompts
    Delete {
        id: String,
        /// Move the category's prompts here instead of deleting them
        #[arg(long)]
        move_to: Option<String>,
        #[arg(long, short, help = "Skip the confirmation")]
        yes: bool,
    },
}
