// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Resolution of invocation parameters into the [`ResolvedConfig`] snapshot.
//!
//! The hosting process owns a [`ConfigResolver`], initializes it once before
//! any network-facing subsystem starts, and hands clones of the snapshot to
//! its collaborators. Resolution either succeeds completely or reports an
//! [`Error`]; a partial snapshot is never published.

use std::{ffi::OsString, fs, path::Path};

use clap::Parser;
use tracing::{debug, info};

use crate::{
    config::{AuthKeys, LocalCert, ResolvedConfig},
    error::{self, Error},
    params::Parameters,
};

/// Resolution state owned by a [`ConfigResolver`].
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub enum ConfigState
{
    /// Parameters have not been consumed yet.
    #[default]
    Unresolved,
    /// Configuration was resolved and is frozen for the process lifetime.
    Resolved(ResolvedConfig,),
}

/// Once-only configuration resolver.
///
/// # Examples
///
/// ```no_run
/// use fortigate_exporter_config::ConfigResolver;
///
/// let mut resolver = ConfigResolver::new();
/// if let Err(error,) = resolver.initialize() {
///     eprintln!("{error}");
///     std::process::exit(1,);
/// }
/// let config = resolver.get_config();
/// println!("listening on {}", config.listen());
/// ```
#[derive(Debug, Default,)]
pub struct ConfigResolver
{
    state: ConfigState,
}

impl ConfigResolver
{
    /// Creates a resolver in the [`ConfigState::Unresolved`] state.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Resolves the configuration from the process arguments.
    ///
    /// Malformed arguments terminate the process through clap's own
    /// reporting. Once resolved, further calls return immediately without
    /// parsing arguments or touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the authentication map or any extra CA file
    /// cannot be read or parsed.
    pub fn initialize(&mut self,) -> Result<(), Error,>
    {
        if self.is_resolved() {
            return Ok((),);
        }

        self.initialize_with(Parameters::parse(),)
    }

    /// Resolves the configuration from an explicit argument list.
    ///
    /// The first item is the program name, as with [`std::env::args_os`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arguments`] for unrecognized or malformed options and
    /// the file errors described on [`resolve`].
    pub fn initialize_from<I, T,>(&mut self, args: I,) -> Result<(), Error,>
    where
        I: IntoIterator<Item = T,>,
        T: Into<OsString,> + Clone,
    {
        if self.is_resolved() {
            return Ok((),);
        }

        let params = Parameters::try_parse_from(args,)?;
        self.initialize_with(params,)
    }

    /// Resolves the configuration from already parsed parameters.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn initialize_with(&mut self, params: Parameters,) -> Result<(), Error,>
    {
        if self.is_resolved() {
            return Ok((),);
        }

        let config = resolve(&params,)?;
        self.state = ConfigState::Resolved(config,);
        Ok((),)
    }

    /// Returns a snapshot of the resolved configuration.
    ///
    /// Before initialization this is the zero-valued configuration.
    pub fn get_config(&self,) -> ResolvedConfig
    {
        match &self.state {
            ConfigState::Resolved(config,) => config.clone(),
            ConfigState::Unresolved => ResolvedConfig::default(),
        }
    }

    /// Current resolution state.
    pub fn state(&self,) -> &ConfigState
    {
        &self.state
    }

    /// Returns `true` once a configuration has been published.
    pub fn is_resolved(&self,) -> bool
    {
        matches!(self.state, ConfigState::Resolved(_))
    }
}

/// Resolves `params` into a configuration snapshot.
///
/// Scalars are copied verbatim, the authentication map is loaded next and the
/// extra CA files last, in the order they were listed.
///
/// # Errors
///
/// Returns [`Error::AuthFileIo`], [`Error::AuthFileParse`] or
/// [`Error::ExtraCaIo`] naming the offending path.
pub fn resolve(params: &Parameters,) -> Result<ResolvedConfig, Error,>
{
    let auth_keys = load_auth_keys(params.auth_file_path(),)?;
    let extra_cas = load_extra_cas(params,)?;

    Ok(ResolvedConfig::new(
        params.listen.clone(),
        params.scrape_timeout,
        params.https_timeout,
        params.insecure,
        auth_keys,
        extra_cas,
    ),)
}

/// Loads the authentication map from `path`.
///
/// # Errors
///
/// Returns [`Error::AuthFileIo`] when the file cannot be read and
/// [`Error::AuthFileParse`] when it is not a flat target to token mapping.
pub fn load_auth_keys(path: &Path,) -> Result<AuthKeys, Error,>
{
    debug!("Reading API authentication map from {}", path.display());
    let contents = fs::read(path,).map_err(|source| error::auth_file_io_error(path, source,),)?;
    let keys = parse_auth_keys(&contents, path,)?;

    info!("Loaded {} API keys", keys.len());
    Ok(keys,)
}

/// Parses an authentication map document read from `path`.
///
/// Blank documents produce an empty map.
///
/// # Errors
///
/// Returns [`Error::AuthFileParse`] when the document is not a flat mapping
/// of scalar keys to scalar values.
pub fn parse_auth_keys(contents: &[u8], path: &Path,) -> Result<AuthKeys, Error,>
{
    if contents.iter().all(u8::is_ascii_whitespace,) {
        return Ok(AuthKeys::default(),);
    }

    serde_yaml::from_slice(contents,).map_err(|source| error::auth_file_parse_error(path, source,),)
}

/// Reads every extra CA file listed in `params`, preserving order.
///
/// # Errors
///
/// Returns [`Error::ExtraCaIo`] for the first file that cannot be read.
pub fn load_extra_cas(params: &Parameters,) -> Result<Vec<LocalCert,>, Error,>
{
    let certs = params
        .extra_ca_paths()
        .map(|raw| {
            let path = Path::new(raw,);
            debug!("Reading extra CA file {}", path.display());
            fs::read(path,)
                .map(|content| LocalCert::new(path, content,),)
                .map_err(|source| error::extra_ca_io_error(path, source,),)
        },)
        .collect::<Result<Vec<_,>, _,>>()?;

    if !certs.is_empty() {
        info!("Loaded {} extra CA files", certs.len());
    }

    Ok(certs,)
}
