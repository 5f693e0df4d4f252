// Command line arguments

use clap::Parser;

/// Builds <dir>/<dirname>_summary.csv from today's saved yad2 vehicle pages.
#[derive(Debug, Parser)]
#[command(name = "yad2_summary", version, about)]
pub struct Cli {
    /// Directory of saved HTML pages (defaults to the configured directory)
    pub directory: Option<String>,

    /// Dump the first record's structure and log skipped records
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directory_and_debug() {
        let cli = Cli::parse_from(["yad2_summary", "pages/toyota", "--debug"]);
        assert_eq!(cli.directory.as_deref(), Some("pages/toyota"));
        assert!(cli.debug);
    }

    #[test]
    fn everything_optional() {
        let cli = Cli::parse_from(["yad2_summary"]);
        assert!(cli.directory.is_none());
        assert!(!cli.debug);
    }
}
