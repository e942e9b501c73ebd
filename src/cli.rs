//! Command-line interface definitions.
//!
//! Two subcommands: `post` runs the news-to-post pipeline, `quotes`
//! refreshes the market quote board. The generation credential can come
//! from a flag or the `GEMINI_API_KEY` environment variable and is only
//! held for the session.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # A post from a topic preset, three articles
/// post_factory post --topic bitcoin --style hype-ant
///
/// # Free-text keyword, custom style file, bilingual fetch
/// post_factory post -k "Rocket Lab launch" --style-file ./my_style.txt --english
///
/// # Market board
/// post_factory quotes
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch news on a topic and generate a styled post
    Post(PostArgs),
    /// Fetch and display the market quote board
    Quotes,
}

#[derive(Args, Debug)]
pub struct PostArgs {
    /// Topic preset label (see config; e.g. bitcoin, nasdaq)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Free-text search keyword (overrides --topic)
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Style preset label (e.g. analogy-analyst, hype-ant)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Path to a custom style description file (overrides --style)
    #[arg(long)]
    pub style_file: Option<PathBuf>,

    /// Number of articles to use
    #[arg(short = 'n', long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub count: u8,

    /// Generation service API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Also fetch the English edition with a translated keyword
    #[arg(long)]
    pub english: bool,

    /// Print the resolved style text and exit
    #[arg(long)]
    pub show_style: bool,

    /// Also write the post bundle as JSON into this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_post_parsing() {
        let cli = Cli::parse_from([
            "post_factory",
            "post",
            "--topic",
            "bitcoin",
            "--style",
            "hype-ant",
            "-n",
            "2",
        ]);
        let Command::Post(args) = cli.command else {
            panic!("expected post subcommand");
        };
        assert_eq!(args.topic.as_deref(), Some("bitcoin"));
        assert_eq!(args.style.as_deref(), Some("hype-ant"));
        assert_eq!(args.count, 2);
        assert!(!args.english);
    }

    #[test]
    fn test_cli_count_defaults_to_three() {
        let cli = Cli::parse_from(["post_factory", "post", "-t", "bitcoin", "-s", "hype-ant"]);
        let Command::Post(args) = cli.command else {
            panic!("expected post subcommand");
        };
        assert_eq!(args.count, 3);
    }

    #[test]
    fn test_cli_count_out_of_range_rejected() {
        let result =
            Cli::try_parse_from(["post_factory", "post", "-t", "bitcoin", "-n", "6"]);
        assert!(result.is_err());
        let result =
            Cli::try_parse_from(["post_factory", "post", "-t", "bitcoin", "-n", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_quotes_subcommand() {
        let cli = Cli::parse_from(["post_factory", "quotes"]);
        assert!(matches!(cli.command, Command::Quotes));
    }

    #[test]
    fn test_cli_global_config_flag() {
        let cli = Cli::parse_from(["post_factory", "quotes", "--config", "./factory.yaml"]);
        assert_eq!(cli.config.as_deref(), Some("./factory.yaml"));
    }
}
