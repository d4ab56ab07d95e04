#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the repocard crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

use std::path::{Path, PathBuf};

/// Message returned to clients when the repository identifier is missing.
pub const MISSING_REPOSITORY_MESSAGE: &str = "Missing owner or repo";
/// Message returned to clients when the data source could not be queried.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch GitHub data.";

/// Unified error type returned by the aggregator, the service and the CLI.
///
/// Request-level variants ([`Error::BadRequest`], [`Error::Upstream`]) carry
/// the plain-text message presented to end users. Remaining variants cover
/// configuration loading and artifact output.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The request lacks data required by the selected rendering mode.
    #[error("{message}")]
    BadRequest {
        /// Human readable message describing the rejected request.
        message: String
    },
    /// A remote call other than the latest-release lookup failed.
    #[error("{message}")]
    Upstream {
        /// Public message describing the failure.
        message: String,
        /// Diagnostic detail reported by the data source.
        detail:  String
    },
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the configuration violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// The HTTP listener could not bind or stopped with an error.
    #[error("HTTP server on {address} failed: {source}")]
    Server {
        /// Socket address the server was asked to listen on.
        address: String,
        /// Underlying I/O error.
        source:  std::io::Error
    },
    /// Wraps I/O errors that occur while writing rendered documents.
    #[error("failed to write rendered document at {path:?}: {source}")]
    Output {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a bad-request error from the provided displayable value.
    pub fn bad_request<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::BadRequest {
            message: message.into()
        }
    }

    /// Constructs an upstream error carrying the public failure message.
    ///
    /// # Parameters
    ///
    /// * `detail` - Diagnostic description of the remote failure. It is kept
    ///   for logging and never shown to clients.
    pub fn upstream<D>(detail: D) -> Self
    where
        D: Into<String>
    {
        Self::Upstream {
            message: UPSTREAM_FAILURE_MESSAGE.to_owned(),
            detail:  detail.into()
        }
    }

    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Server`] variant for the given listen address.
pub fn server_error(address: &str, source: std::io::Error) -> Error {
    Error::Server {
        address: address.to_owned(),
        source
    }
}

/// Creates an [`Error::Output`] variant capturing the failing path and source.
pub fn output_error(path: &Path, source: std::io::Error) -> Error {
    Error::Output {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, UPSTREAM_FAILURE_MESSAGE};

    #[test]
    fn bad_request_displays_message_verbatim() {
        let error = Error::bad_request("Missing owner or repo");
        assert_eq!(error.to_string(), "Missing owner or repo");
    }

    #[test]
    fn upstream_hides_detail_from_display() {
        let error = Error::upstream("GitHub returned 403: rate limited");
        assert_eq!(error.to_string(), UPSTREAM_FAILURE_MESSAGE);
        match error {
            Error::Upstream {
                ref detail, ..
            } => assert!(detail.contains("rate limited")),
            other => panic!("expected upstream error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::validation("display me");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/repocard.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn output_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/badge.svg");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::output_error(path, io_error);

        assert!(matches!(error, Error::Output { .. }));
        assert!(error.to_string().contains("badge.svg"));
    }

    #[test]
    fn server_error_names_listen_address() {
        let io_error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let error = super::server_error("127.0.0.1:8080", io_error);

        assert!(matches!(error, Error::Server { .. }));
        assert_eq!(
            error.to_string(),
            "HTTP server on 127.0.0.1:8080 failed: address in use"
        );
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }
}
