use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "logsift",
    about = "Filter log trees by keyword and level, mirror the matches, and build hierarchical summaries",
    version = "0.1.0",
    author = "LogSift Team"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline once over an input tree
    Run {
        /// Input directory containing log files and/or zip archives
        #[arg(short, long)]
        input: String,

        /// Output directory for the filtered mirror and summaries
        #[arg(short, long)]
        output: String,

        /// Keyword to match (repeatable; a line passes on any match)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Log level token to match (e.g. INFO, ERROR)
        #[arg(short, long)]
        level: Option<String>,

        /// File pattern; the `*` is stripped and the rest matched as a suffix
        #[arg(short, long, default_value = "*.log")]
        pattern: String,

        /// Skip archive expansion
        #[arg(long)]
        no_expand: bool,

        /// Delete source archives after extraction
        #[arg(long)]
        delete_archives: bool,

        /// Pause between processing and aggregation, in milliseconds
        #[arg(long, default_value = "1000")]
        settle_delay_ms: u64,

        /// Report format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Collect the same parameters interactively on stdin, then run
    Interactive,

    /// Start the HTTP upload endpoint
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_arguments_parse() {
        let cli = Cli::try_parse_from([
            "logsift", "run", "--input", "/in", "--output", "/out", "--keyword", "error",
            "--keyword", "timeout", "--level", "WARN",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                input,
                output,
                keywords,
                level,
                pattern,
                settle_delay_ms,
                ..
            } => {
                assert_eq!(input, "/in");
                assert_eq!(output, "/out");
                assert_eq!(keywords, vec!["error", "timeout"]);
                assert_eq!(level.as_deref(), Some("WARN"));
                assert_eq!(pattern, "*.log");
                assert_eq!(settle_delay_ms, 1000);
            }
            _ => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn test_serve_port_is_optional() {
        let cli = Cli::try_parse_from(["logsift", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: None }));

        let cli = Cli::try_parse_from(["logsift", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080) }));
    }

    #[test]
    fn test_missing_required_arguments_fail() {
        assert!(Cli::try_parse_from(["logsift", "run", "--input", "/in"]).is_err());
    }
}
