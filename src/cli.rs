use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the recipe CSV dataset
    #[arg(short, long, default_value = "recipes.csv")]
    pub recipes_file: PathBuf,

    /// Address the HTTP server binds to
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    pub bind: String,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
