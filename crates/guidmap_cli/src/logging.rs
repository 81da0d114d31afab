//! Log subscriber setup.

use guidmap_config::LogLevel;
use tracing_subscriber::EnvFilter;

use crate::GlobalArgs;

/// Picks the default filter directive from the CLI flags and config.
///
/// `--quiet` beats `--verbose`, which beats the configured level.
pub fn default_directive(global: &GlobalArgs, level: LogLevel) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        level.as_str()
    }
}

/// Installs the stderr `tracing` subscriber. `RUST_LOG` takes precedence over
/// everything else.
pub fn init_logging(global: &GlobalArgs, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(global, level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals(quiet: bool, verbose: bool) -> GlobalArgs {
        GlobalArgs {
            quiet,
            verbose,
            cache: None,
            config: None,
        }
    }

    #[test]
    fn quiet_wins() {
        assert_eq!(
            default_directive(&globals(true, true), LogLevel::Trace),
            "error"
        );
    }

    #[test]
    fn verbose_overrides_config() {
        assert_eq!(
            default_directive(&globals(false, true), LogLevel::Warn),
            "debug"
        );
    }

    #[test]
    fn config_level_is_default() {
        assert_eq!(
            default_directive(&globals(false, false), LogLevel::Warn),
            "warn"
        );
    }
}
