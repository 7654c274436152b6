//! Startup helpers for the lookup binary.
//!
//! One-shot mode: resolve the company name given on the command line,
//! or clear the snapshot cache with `clear-cache`.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::resolver::{
    FileSnapshotCache, ResolvedMatch, ResolverBackends, ResolverConfig, ResolverResult,
    ResolverService,
};

/// Environment variable naming a remote dataset URL.
const ENV_DATA_URL: &str = "SPONSORLENS_DATA_URL";
/// Environment variable overriding the freshness window, in hours.
const ENV_CACHE_HOURS: &str = "SPONSORLENS_CACHE_HOURS";
/// Environment variable naming a persistent cache file.
const ENV_CACHE_FILE: &str = "SPONSORLENS_CACHE_FILE";
/// Roles printed per match.
const MAX_PRINTED_ROLES: usize = 5;

/// Run the lookup binary.
///
/// Usage: `lookup <company name>` or `lookup clear-cache`.
///
/// # Returns
/// `ExitCode::SUCCESS` on a completed lookup (matched or not), `1` on
/// failure, `2` on usage errors.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = args.join(" ");
    let query = query.trim();
    if query.is_empty() {
        eprintln!("usage: lookup <company name> | lookup clear-cache");
        return ExitCode::from(2);
    }

    let service = match build_service(config_from_env()) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("Failed to build resolver: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if query == "clear-cache" {
        return match rt.block_on(service.invalidate_cache()) {
            Ok(()) => {
                println!("Cache cleared.");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Failed to clear cache: {e}");
                ExitCode::from(1)
            }
        };
    }

    match rt.block_on(service.resolve(query)) {
        Ok(Some(found)) => {
            print_match(&found);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("No sponsorship records found.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Lookup failed: {e}");
            ExitCode::from(1)
        }
    }
}

/// Read resolver configuration overrides from the environment.
fn config_from_env() -> ResolverConfig {
    let mut config = ResolverConfig::default();

    if let Ok(url) = std::env::var(ENV_DATA_URL) {
        if !url.trim().is_empty() {
            config = config.with_source_url(url);
        }
    }

    if let Ok(hours) = std::env::var(ENV_CACHE_HOURS) {
        if let Ok(hours) = hours.parse::<u64>() {
            if hours > 0 {
                config = config.with_freshness_window(Duration::from_secs(hours * 3600));
            }
        }
    }

    config
}

/// Build the service, swapping in a file-backed cache when configured.
fn build_service(config: ResolverConfig) -> ResolverResult<ResolverService> {
    match std::env::var(ENV_CACHE_FILE) {
        Ok(path) if !path.trim().is_empty() => {
            let mut backends = ResolverBackends::bundled_http(&config)?;
            backends.cache = Arc::new(FileSnapshotCache::new(path));
            ResolverService::with_backends(config, backends)
        }
        _ => ResolverService::new(config),
    }
}

/// Print a match the way the interactive popup renders it.
fn print_match(found: &ResolvedMatch) {
    let display = found.company.as_deref().unwrap_or("Unknown company");
    println!("H1B sponsorship found: {display}");
    for role in found.roles.iter().take(MAX_PRINTED_ROLES) {
        println!("  - {role}");
    }
}
