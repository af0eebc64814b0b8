// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declaration of the command-line options recognized by the exporter.
//!
//! [`Parameters`] is a schema only: parsing it has no side effects, and none
//! of the referenced files are touched until the resolver consumes the values.

use std::path::Path;

use clap::{ArgAction, Parser};

/// Default bind address of the exporter's HTTP server.
pub const DEFAULT_LISTEN: &str = ":9710";
/// Default upper bound for a single scrape, in seconds.
pub const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 30;
/// Default upper bound for an outbound TLS handshake, in seconds.
pub const DEFAULT_HTTPS_TIMEOUT_SECS: u64 = 10;
/// Separator used by the `--extra-ca-certs` list.
const EXTRA_CA_SEPARATOR: char = ',';

/// Raw invocation parameters as presented on the command line.
///
/// Timeouts are unsigned seconds: a negative value is treated as a malformed
/// option and rejected at parse time, like any other non-numeric input.
#[derive(Debug, Clone, PartialEq, Eq, Parser,)]
#[command(name = "fortigate-exporter", version, about = "Prometheus exporter for FortiGate devices")]
pub struct Parameters
{
    /// file containing the authentication map to use when connecting to a
    /// Fortigate device
    #[arg(long = "auth-file", value_name = "PATH", default_value = "")]
    pub auth_file: String,

    /// address to listen on
    #[arg(long = "listen", value_name = "ADDR", default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// max seconds to allow a scrape to take
    #[arg(
        long = "scrape-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_SCRAPE_TIMEOUT_SECS
    )]
    pub scrape_timeout: u64,

    /// TLS Handshake timeout in seconds
    #[arg(
        long = "https-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_HTTPS_TIMEOUT_SECS
    )]
    pub https_timeout: u64,

    /// Allow insecure certificates
    #[arg(
        long = "insecure",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub insecure: bool,

    /// comma-separated files containing extra PEMs to trust for TLS
    /// connections in addition to the system trust store
    #[arg(long = "extra-ca-certs", value_name = "PATHS", default_value = "")]
    pub extra_ca_certs: String,
}

impl Parameters
{
    /// Returns the authentication map location as a path.
    pub fn auth_file_path(&self,) -> &Path
    {
        Path::new(&self.auth_file,)
    }

    /// Iterates over the extra CA paths in the order they were listed.
    ///
    /// Empty segments are skipped, so an empty value, doubled separators, and
    /// leading or trailing commas never yield a blank path.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use fortigate_exporter_config::Parameters;
    ///
    /// let params = Parameters::parse_from(["exporter", "--extra-ca-certs", ",a.pem,,b.pem,"],);
    /// let paths: Vec<_,> = params.extra_ca_paths().collect();
    /// assert_eq!(paths, ["a.pem", "b.pem"]);
    /// ```
    pub fn extra_ca_paths(&self,) -> impl Iterator<Item = &str,> + '_
    {
        self.extra_ca_certs.split(EXTRA_CA_SEPARATOR,).filter(|segment| !segment.is_empty(),)
    }
}
