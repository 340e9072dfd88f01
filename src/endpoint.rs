// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: HTTP endpoint value types bound to virtual files and folders.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use serde::Deserialize;

/// HTTP operation producing a virtual file's bytes, or a dynamic folder's
/// child-list description. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEndpoint {
    /// HTTP method, passed through verbatim to the transport.
    pub method: String,
    /// Absolute endpoint URL.
    pub url: String,
}

/// HTTP operation accepting uploaded bytes as a multipart form file field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteEndpoint {
    /// Absolute endpoint URL; uploads are always POSTed.
    pub url: String,
    /// Name of the multipart form field carrying the file.
    pub field_name: String,
}

/// Wire shape of an `Endpoint` member in configuration files and dynamic
/// folder descriptions. Both halves are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointDescription {
    /// Optional read operation.
    #[serde(rename = "Read")]
    pub read: Option<ReadDescription>,
    /// Optional write operation.
    #[serde(rename = "Write")]
    pub write: Option<WriteDescription>,
}

/// Wire shape of a read operation: `{"Method": ..., "URL": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadDescription {
    /// HTTP method.
    #[serde(rename = "Method")]
    pub method: String,
    /// Endpoint URL.
    #[serde(rename = "URL")]
    pub url: String,
}

/// Wire shape of a write operation: `{"URL": ..., "Parameter": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteDescription {
    /// Endpoint URL.
    #[serde(rename = "URL")]
    pub url: String,
    /// Multipart form field name.
    #[serde(rename = "Parameter")]
    pub parameter: String,
}

impl From<ReadDescription> for ReadEndpoint {
    fn from(description: ReadDescription) -> Self {
        Self {
            method: description.method,
            url: description.url,
        }
    }
}

impl From<WriteDescription> for WriteEndpoint {
    fn from(description: WriteDescription) -> Self {
        Self {
            url: description.url,
            field_name: description.parameter,
        }
    }
}
