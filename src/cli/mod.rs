// Command-line interface
pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "souschef")]
#[command(about = "Souschef - structured recipe parsing and cooking Q&A", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a recipe file and print its structured form
    Parse {
        /// Recipe text file (title, ingredients section, directions section)
        file: PathBuf,

        /// Emit the parsed recipe as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer one or more questions about a recipe
    Ask {
        /// Recipe text file
        file: PathBuf,

        /// Questions to answer, in order
        #[arg(required = true)]
        questions: Vec<String>,
    },

    /// Start an interactive cooking session
    Chat {
        /// Recipe text file
        file: PathBuf,
    },
}
