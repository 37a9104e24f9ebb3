//! DSFR documentation site maintenance CLI.
//!
//! Provides commands for:
//! - `titles`: Report the titles of exported WordPress articles as CSV
//! - `sort`: Copy exported articles into the documentation tree from a CSV table
//! - `nav`: Regenerate the `nav` section of `mkdocs.yml`
//! - `theme`: Check the DSFR theme registration

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{NavArgs, SortArgs, ThemeArgs, TitlesArgs};
use output::Output;

/// DSFR documentation site maintenance tools.
#[derive(Parser)]
#[command(name = "dsfr", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover dsfr.toml).
    #[arg(short, long, global = true, env = "DSFR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract article titles into a CSV report.
    Titles(TitlesArgs),
    /// Copy exported articles to their destinations.
    Sort(SortArgs),
    /// Regenerate the site navigation.
    Nav(NavArgs),
    /// Check the theme registration.
    Theme(ThemeArgs),
}

/// `--verbose` enables INFO level, otherwise use `RUST_LOG` or default to WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Titles(args) => args.execute(config),
        Commands::Sort(args) => args.execute(config),
        Commands::Nav(args) => args.execute(config),
        Commands::Theme(args) => args.execute(config),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).to_string(), "warn");
        assert_eq!(log_filter(false, Some("")).to_string(), "warn");
    }

    #[test]
    fn test_log_filter_verbose_and_rust_log() {
        assert_eq!(log_filter(true, Some("error")).to_string(), "info");
        assert_eq!(
            log_filter(false, Some("dsfr_nav=debug")).to_string(),
            "dsfr_nav=debug"
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["dsfr", "nav", "--dry-run", "-v", "-c", "site/dsfr.toml"])
            .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site/dsfr.toml")));
        assert!(matches!(cli.command, Commands::Nav(_)));
    }

    #[test]
    fn test_simulation_alias() {
        let cli = Cli::try_parse_from(["dsfr", "sort", "--simulation"]).unwrap();
        let Commands::Sort(args) = cli.command else {
            panic!("expected sort command");
        };
        assert!(args.dry_run);
    }
}
