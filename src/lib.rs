// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Crate root for the http-door virtual filesystem library.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! http-door exposes a set of remote HTTP resources as a navigable,
//! per-user virtual filesystem suitable for serving through an FTP-style
//! protocol engine. Each virtual file is bound to an HTTP endpoint that
//! produces its bytes on read and optionally accepts uploads on write;
//! folders may be static or dynamic, the latter populated lazily from an
//! HTTP endpoint returning a JSON child-list description.
//!
//! The protocol engine itself (connection handling, command parsing,
//! session lifecycle) is an external collaborator: this crate exposes the
//! filesystem only as a Rust API through the [`driver::FtpDriver`]
//! callback trait, in the same way other engines integrate file trees
//! through their own driver seams.

use std::path::PathBuf;

use thiserror::Error;

/// Command-line inspection of configured virtual trees.
pub mod cli;
/// Per-user configuration files and the startup registry.
pub mod config;
/// The FTP-style driver seam and its HTTP-backed implementation.
pub mod driver;
/// Read and write endpoint bindings and their wire descriptions.
pub mod endpoint;
/// Virtual files and folders decoded from JSON descriptions.
pub mod entity;
/// The flat path-keyed store behind each virtual tree.
pub mod index;
/// Dynamic folder refresh and read/write endpoint resolution.
pub mod resolve;
/// Blocking HTTP transport for fetches and multipart uploads.
pub mod transport;

pub use config::{Registry, UserConfig};
pub use driver::{DirEntry, FtpDriver, HttpDriver, HttpDriverFactory};
pub use endpoint::{ReadEndpoint, WriteEndpoint};
pub use entity::{Entity, EntityDescription, FileEntity, FolderEntity};
pub use index::{Node, PathIndex};
pub use transport::{HttpBody, HttpTransport, TransportError, UreqTransport};

/// Errors surfaced by http-door operations.
///
/// Configuration variants are fatal at startup; every per-request variant
/// is recovered inside the driver and reported to the protocol engine only
/// as the boolean or empty outcome its callback contract allows.
#[derive(Debug, Error)]
pub enum DoorError {
    /// The configuration directory does not exist.
    #[error("the configuration path does not exist: {0}")]
    ConfigurationNotFound(PathBuf),
    /// The configuration path exists but is not a directory.
    #[error("the configuration path is not a directory: {0}")]
    ConfigurationNotADirectory(PathBuf),
    /// A configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigurationIo {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A configuration file contained malformed JSON or an invalid entity.
    #[error("invalid configuration {path}: {detail}")]
    ConfigurationInvalid {
        /// File that failed to decode.
        path: PathBuf,
        /// Decode or validation failure detail.
        detail: String,
    },
    /// No entity occupies the supplied virtual path.
    #[error("path not found: {0}")]
    PathNotFound(String),
    /// The path names a folder (or nothing) where a file was required.
    #[error("not a file: {0}")]
    NotAFile(String),
    /// The path names a file where a folder was required.
    #[error("not a folder: {0}")]
    NotAFolder(String),
    /// The entity carries no read endpoint.
    #[error("no readable endpoint for {0}")]
    NoReadableEndpoint(String),
    /// Neither the file nor its enclosing folder carries a write endpoint.
    #[error("no writable endpoint for {0}")]
    NoWritableEndpoint(String),
    /// The HTTP transport failed while fetching a dynamic folder.
    #[error("fetch from {url} failed: {source}")]
    FetchFailed {
        /// Endpoint URL that was fetched.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },
    /// A dynamic folder fetch returned an undecodable child-list body.
    #[error("invalid folder description from {url}: {detail}")]
    InvalidDescription {
        /// Endpoint URL that produced the body.
        url: String,
        /// Decode or validation failure detail.
        detail: String,
    },
}
