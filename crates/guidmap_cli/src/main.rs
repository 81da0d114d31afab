//! guidmap CLI: maintains the GUID to asset name cache used by export tools.
//!
//! Provides `guidmap hash` to compute GUIDs, `guidmap add` and `guidmap import`
//! to register names, `guidmap lookup` and `guidmap dump` to read them back,
//! and `guidmap inspect`, `guidmap upgrade`, and `guidmap clear` to maintain
//! the cache file itself.

#![warn(missing_docs)]

mod add;
mod dump;
mod import;
mod inspect;
mod logging;
mod lookup;
mod session;
mod upgrade;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use guidmap_common::Guid;

/// guidmap: reverse lookup from asset GUIDs to their original names.
#[derive(Parser, Debug)]
#[command(name = "guidmap", version, about = "GUID name cache maintenance")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the cache file (overrides `cache.path` from the config).
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Path to a custom `guidmap.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the GUID of each name without touching the cache.
    Hash(HashArgs),
    /// Register names in the cache.
    Add(AddArgs),
    /// Register every line of one or more text lists.
    Import(ImportArgs),
    /// Resolve GUIDs to names.
    Lookup(LookupArgs),
    /// Print every cached entry.
    Dump(DumpArgs),
    /// Show the header and integrity of the cache file.
    Inspect,
    /// Rewrite a legacy cache file in the current format.
    Upgrade,
    /// Replace the cache file with an empty one.
    Clear,
}

/// Arguments for `guidmap hash`.
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Names to hash.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for `guidmap add`.
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Names to register.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Container file holding these assets (e.g. `common.rpak`).
    #[arg(short, long)]
    pub file_name: Option<String>,
}

/// Arguments for `guidmap import`.
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Text files with one name per line.
    #[arg(required = true)]
    pub lists: Vec<PathBuf>,
}

/// Arguments for `guidmap lookup`.
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// GUIDs in decimal or `0x` hexadecimal.
    #[arg(required = true)]
    pub guids: Vec<Guid>,
}

/// Arguments for `guidmap dump`.
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Output format for listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Cache file override.
    pub cache: Option<PathBuf>,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        cache: cli.cache,
        config: cli.config,
    };

    let config = match session::resolve_config(&global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    logging::init_logging(&global, config.log.level);

    let result = match cli.command {
        Command::Hash(ref args) => add::run_hash(args, &global),
        Command::Add(ref args) => add::run(args, &global, &config),
        Command::Import(ref args) => import::run(args, &global, &config),
        Command::Lookup(ref args) => lookup::run(args, &global, &config),
        Command::Dump(ref args) => dump::run(args, &global, &config),
        Command::Inspect => inspect::run(&global, &config),
        Command::Upgrade => upgrade::run(&global, &config),
        Command::Clear => upgrade::run_clear(&global, &config),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_hash() {
        let cli = Cli::parse_from(["guidmap", "hash", "a", "b"]);
        match cli.command {
            Command::Hash(args) => assert_eq!(args.names, vec!["a", "b"]),
            _ => panic!("expected Hash command"),
        }
    }

    #[test]
    fn parse_add_with_file_name() {
        let cli = Cli::parse_from([
            "guidmap",
            "add",
            "models/bar.rmdl",
            "--file-name",
            "common.rpak",
        ]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.names, vec!["models/bar.rmdl"]);
                assert_eq!(args.file_name.as_deref(), Some("common.rpak"));
            }
            _ => panic!("expected Add command"),
        }
    }

    #[test]
    fn parse_add_requires_names() {
        assert!(Cli::try_parse_from(["guidmap", "add"]).is_err());
    }

    #[test]
    fn parse_lookup_hex_and_decimal() {
        let cli = Cli::parse_from(["guidmap", "lookup", "0x10", "16"]);
        match cli.command {
            Command::Lookup(args) => {
                assert_eq!(args.guids, vec![Guid::from_raw(16), Guid::from_raw(16)]);
            }
            _ => panic!("expected Lookup command"),
        }
    }

    #[test]
    fn parse_lookup_rejects_bad_guid() {
        assert!(Cli::try_parse_from(["guidmap", "lookup", "xyz"]).is_err());
    }

    #[test]
    fn parse_dump_json() {
        let cli = Cli::parse_from(["guidmap", "dump", "--format", "json"]);
        match cli.command {
            Command::Dump(args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Dump command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from([
            "guidmap",
            "inspect",
            "--cache",
            "names.bin",
            "--config",
            "alt.toml",
            "-q",
        ]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.cache, Some(PathBuf::from("names.bin")));
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Command::Inspect));
    }

    #[test]
    fn parse_maintenance_commands() {
        assert!(matches!(
            Cli::parse_from(["guidmap", "upgrade"]).command,
            Command::Upgrade
        ));
        assert!(matches!(
            Cli::parse_from(["guidmap", "clear"]).command,
            Command::Clear
        ));
    }
}
