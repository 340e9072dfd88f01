// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Recursive entity tree decoded from JSON descriptions.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use serde::Deserialize;
use thiserror::Error;

use crate::endpoint::{EndpointDescription, ReadEndpoint, WriteEndpoint};

/// A node in the virtual filesystem tree. Exactly one case is active, so
/// the both-set and neither-set states of the wire shape are
/// unrepresentable after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// A virtual file bound to HTTP endpoints.
    File(FileEntity),
    /// A virtual folder, static or dynamic.
    Folder(FolderEntity),
}

/// A virtual file. `size_bytes` is advisory: the reported size need not
/// match the byte count actually fetched on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntity {
    /// Entry name; never empty, never contains `/`.
    pub name: String,
    /// Advisory size reported in listings and stat.
    pub size_bytes: u64,
    /// Endpoint producing the file's bytes on read.
    pub read: Option<ReadEndpoint>,
    /// Endpoint accepting uploaded bytes, overriding the folder's.
    pub write: Option<WriteEndpoint>,
}

/// A virtual folder. A folder with a read endpoint is dynamic: its
/// children are a placeholder until first resolved, and every visit
/// re-fetches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntity {
    /// Entry name; never empty, never contains `/`.
    pub name: String,
    /// Ordered children; the authoritative listing order.
    pub children: Vec<Entity>,
    /// Endpoint returning the folder's JSON child-list description.
    pub read: Option<ReadEndpoint>,
    /// Endpoint accepting uploads of new names under this folder.
    pub write: Option<WriteEndpoint>,
}

impl Entity {
    /// Entry name of either case.
    pub fn name(&self) -> &str {
        match self {
            Entity::File(file) => &file.name,
            Entity::Folder(folder) => &folder.name,
        }
    }

    /// True for the folder case.
    pub fn is_folder(&self) -> bool {
        matches!(self, Entity::Folder(_))
    }
}

/// Validation failures while converting wire descriptions into entities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityError {
    /// The description set both `File` and `Folder`, or neither.
    #[error("entity '{0}' must declare exactly one of File or Folder")]
    AmbiguousKind(String),
    /// The name was empty or contained the path separator.
    #[error("invalid entity name '{0}'")]
    InvalidName(String),
}

/// Wire shape of one entity in configuration files and dynamic folder
/// payloads: `{"Name": ..., "File": {...}}` or `{"Name": ..., "Folder":
/// {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDescription {
    /// Entry name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// File case, mutually exclusive with `folder`.
    #[serde(rename = "File")]
    pub file: Option<FileDescription>,
    /// Folder case, mutually exclusive with `file`.
    #[serde(rename = "Folder")]
    pub folder: Option<FolderDescription>,
}

/// Wire shape of the `File` member.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDescription {
    /// Advisory size; defaults to zero when omitted.
    #[serde(rename = "Size", default)]
    pub size: u64,
    /// Optional endpoint pair.
    #[serde(rename = "Endpoint")]
    pub endpoint: Option<EndpointDescription>,
}

/// Wire shape of the `Folder` member.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderDescription {
    /// Statically declared children; empty for dynamic folders.
    #[serde(rename = "Entities", default)]
    pub entities: Vec<EntityDescription>,
    /// Optional endpoint pair.
    #[serde(rename = "Endpoint")]
    pub endpoint: Option<EndpointDescription>,
}

/// Convert a decoded description list into validated entities, preserving
/// order.
pub fn decode_entities(descriptions: Vec<EntityDescription>) -> Result<Vec<Entity>, EntityError> {
    descriptions.into_iter().map(Entity::try_from).collect()
}

impl TryFrom<EntityDescription> for Entity {
    type Error = EntityError;

    fn try_from(description: EntityDescription) -> Result<Self, Self::Error> {
        if description.name.is_empty() || description.name.contains('/') {
            return Err(EntityError::InvalidName(description.name));
        }
        match (description.file, description.folder) {
            (Some(file), None) => {
                let (read, write) = split_endpoint(file.endpoint);
                Ok(Entity::File(FileEntity {
                    name: description.name,
                    size_bytes: file.size,
                    read,
                    write,
                }))
            }
            (None, Some(folder)) => {
                let children = decode_entities(folder.entities)?;
                let (read, write) = split_endpoint(folder.endpoint);
                Ok(Entity::Folder(FolderEntity {
                    name: description.name,
                    children,
                    read,
                    write,
                }))
            }
            _ => Err(EntityError::AmbiguousKind(description.name)),
        }
    }
}

fn split_endpoint(
    description: Option<EndpointDescription>,
) -> (Option<ReadEndpoint>, Option<WriteEndpoint>) {
    match description {
        Some(endpoint) => (endpoint.read.map(Into::into), endpoint.write.map(Into::into)),
        None => (None, None),
    }
}
