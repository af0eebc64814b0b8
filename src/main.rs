//! Command-line entry point that resolves the exporter configuration.
//!
//! The binary resolves the configuration exactly once and terminates with a
//! diagnostic when anything is missing or malformed.

use std::{io, process};

use fortigate_exporter_config::{ConfigResolver, Error, ResolvedConfig};
use tracing_subscriber::EnvFilter;

/// Entry point that reports errors and sets the appropriate exit status.
fn main()
{
    init_tracing();

    if let Err(error,) = run() {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Resolves the configuration and logs what was loaded.
///
/// # Errors
///
/// Propagates resolution failures.
fn run() -> Result<(), Error,>
{
    let mut resolver = ConfigResolver::new();
    resolver.initialize()?;

    tracing::info!("{}", describe(&resolver.get_config(),));
    Ok((),)
}

/// One-line description of `config` without tokens or certificate bytes.
fn describe(config: &ResolvedConfig,) -> String
{
    format!(
        "Resolved configuration: listen={} scrape_timeout={}s https_timeout={}s insecure={} \
         targets={} extra_cas={}",
        config.listen(),
        config.scrape_timeout_secs(),
        config.tls_timeout_secs(),
        config.tls_insecure(),
        config.auth_keys().len(),
        config.tls_extra_cas().len()
    )
}
