// src/cli/mod.rs — CLI definition (clap derive)

pub mod evaluate;
pub mod export;
pub mod patterns;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rubric",
    about = "Scores model responses and profiles cognitive patterns",
    version
)]
pub struct Cli {
    /// Response text to evaluate (default command when no subcommand given)
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,

    /// Model name the response came from (drives tokenizer selection)
    #[arg(short, long, default_value = "unknown")]
    pub model: String,

    /// Reasoning type (chain_of_thought, multi_hop, verification,
    /// mathematical, backward, scaffolded)
    #[arg(short, long)]
    pub reasoning: Option<String>,

    /// Test category (medical, legal, financial, scientific, engineering)
    #[arg(long)]
    pub category: Option<String>,

    /// Test definition JSON file — switches to enhanced scoring
    #[arg(short, long)]
    pub test: Option<String>,

    /// Read the response from a file instead of arguments
    #[arg(short, long)]
    pub file: Option<String>,

    /// Read the response from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Emit the full result as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Persist the result to the evaluation history
    #[arg(long)]
    pub save: bool,

    /// Cognitive domain to file the result under when saving
    #[arg(long)]
    pub domain: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze stored scores into a cognitive profile
    Patterns {
        /// Model whose history to analyze
        #[arg(short, long)]
        model: String,
        /// Persist detected patterns to the database
        #[arg(long)]
        save: bool,
        /// Emit the profile as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export stored evaluations
    Export {
        /// Model whose history to export
        #[arg(short, long)]
        model: String,
        /// Export format (json, csv)
        #[arg(long, default_value = "json")]
        format: String,
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}
