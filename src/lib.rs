//! Startup configuration for the FortiGate metrics exporter.
//!
//! The library declares the recognized command-line options, resolves them
//! once into an immutable [`ResolvedConfig`], and loads the two pieces of
//! on-disk state the exporter needs: the per-target authentication tokens and
//! any extra certificate authorities to trust for outbound TLS. Failures are
//! reported as typed [`Error`] values; terminating the process is left to the
//! caller.

mod config;
mod error;
mod params;
mod resolver;

pub use config::{AuthKeys, LocalCert, ResolvedConfig, Target, Token};
pub use error::{Error, auth_file_io_error, auth_file_parse_error, extra_ca_io_error};
pub use params::{
    DEFAULT_HTTPS_TIMEOUT_SECS, DEFAULT_LISTEN, DEFAULT_SCRAPE_TIMEOUT_SECS, Parameters,
};
pub use resolver::{
    ConfigResolver, ConfigState, load_auth_keys, load_extra_cas, parse_auth_keys, resolve,
};
