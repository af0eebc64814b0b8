#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the configuration resolver."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Every variant is fatal at startup. The library only reports them; deciding
//! to terminate is left to the binary entry point.

use std::path::{Path, PathBuf};

/// Unified error type returned while resolving the exporter configuration.
///
/// Variants carry the offending path so the diagnostic printed before exit
/// identifies the file. Token values are never part of an error message.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The authentication map file could not be read.
    #[error("failed to read API authentication map file {path:?}: {source}")]
    AuthFileIo {
        /// Location of the authentication map file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// The authentication map file is not a flat target to token mapping.
    #[error("failed to parse API authentication map file {path:?}: {source}")]
    AuthFileParse {
        /// Location of the authentication map file.
        path:   PathBuf,
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// One of the extra CA files could not be read.
    #[error("failed to read extra CA file {path:?}: {source}")]
    ExtraCaIo {
        /// Location of the certificate file as listed on the command line.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Invocation parameters were unrecognized or malformed.
    #[error("invalid invocation parameters: {source}")]
    Arguments {
        /// Parse error reported by clap.
        source: clap::Error
    }
}

impl Error {
    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }

    /// Returns the file path associated with the failure, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::AuthFileIo {
                path, ..
            }
            | Self::AuthFileParse {
                path, ..
            }
            | Self::ExtraCaIo {
                path, ..
            } => Some(path.as_path()),
            Self::Arguments {
                ..
            } => None
        }
    }
}

impl From<clap::Error> for Error {
    fn from(source: clap::Error) -> Self {
        Self::Arguments {
            source
        }
    }
}

/// Creates an [`Error::AuthFileIo`] variant capturing the failing path.
///
/// # Parameters
///
/// * `path` - Location of the authentication map file.
/// * `source` - I/O error reported by the operating system.
pub fn auth_file_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::AuthFileIo {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::AuthFileParse`] variant capturing the failing path.
///
/// # Parameters
///
/// * `path` - Location of the authentication map file.
/// * `source` - Decoding error reported by serde_yaml.
pub fn auth_file_parse_error(path: &Path, source: serde_yaml::Error) -> Error {
    Error::AuthFileParse {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ExtraCaIo`] variant capturing the failing path.
///
/// # Parameters
///
/// * `path` - Location of the certificate file.
/// * `source` - I/O error reported by the operating system.
pub fn extra_ca_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ExtraCaIo {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Error;

    #[test]
    fn to_display_string_matches_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::auth_file_io_error(Path::new("/etc/auth.yaml"), io_error);
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn auth_file_io_error_helper_wraps_path_and_source() {
        let path = Path::new("/tmp/auth.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::auth_file_io_error(path, io_error);

        match error {
            Error::AuthFileIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected auth file io error, got {other:?}")
        }
    }

    #[test]
    fn auth_file_parse_error_mentions_path() {
        let source = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let error = super::auth_file_parse_error(Path::new("/tmp/auth.yaml"), source);

        assert!(matches!(error, Error::AuthFileParse { .. }));
        assert!(error.to_string().contains("/tmp/auth.yaml"));
        assert_eq!(error.path(), Some(Path::new("/tmp/auth.yaml")));
    }

    #[test]
    fn extra_ca_io_error_helper_wraps_path_and_source() {
        let path = Path::new("/tmp/ca.pem");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::extra_ca_io_error(path, io_error);

        match error {
            Error::ExtraCaIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected extra ca io error, got {other:?}")
        }
    }

    #[test]
    fn clap_conversion_maps_to_arguments_variant() {
        let error = clap::Error::new(clap::error::ErrorKind::UnknownArgument);
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Arguments { .. }));
        assert!(mapped.path().is_none());
    }
}
