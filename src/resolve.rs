// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Dynamic folder resolution and read/write endpoint selection.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use log::debug;

use crate::endpoint::{ReadEndpoint, WriteEndpoint};
use crate::entity::{decode_entities, EntityDescription};
use crate::index::{Node, PathIndex};
use crate::transport::HttpTransport;
use crate::DoorError;

/// Fetch a dynamic folder's JSON child-list description and splice the
/// decoded entities into the tree and index.
///
/// The folder at `path` must already be indexed and carry a read endpoint.
/// Any fetch or decode failure leaves the folder untouched, so a client
/// retry simply re-attempts the fetch. Deliberately not idempotent: the
/// read endpoint is never cleared, and every call re-fetches, which is how
/// each directory-change visit re-synchronizes the folder's contents.
pub fn resolve_folder(
    index: &mut PathIndex,
    transport: &dyn HttpTransport,
    path: &str,
) -> Result<(), DoorError> {
    let endpoint = match index.lookup(path) {
        Some(Node::Folder(folder)) => folder
            .read
            .clone()
            .ok_or_else(|| DoorError::NoReadableEndpoint(path.to_owned()))?,
        Some(Node::File(_)) => return Err(DoorError::NotAFolder(path.to_owned())),
        None => return Err(DoorError::PathNotFound(path.to_owned())),
    };
    debug!("resolving {path} via {} {}", endpoint.method, endpoint.url);
    let body = transport
        .perform(&endpoint.method, &endpoint.url)
        .map_err(|source| DoorError::FetchFailed {
            url: endpoint.url.clone(),
            source,
        })?;
    let descriptions: Vec<EntityDescription> =
        serde_json::from_slice(&body.bytes).map_err(|err| DoorError::InvalidDescription {
            url: endpoint.url.clone(),
            detail: err.to_string(),
        })?;
    let entities = decode_entities(descriptions).map_err(|err| DoorError::InvalidDescription {
        url: endpoint.url.clone(),
        detail: err.to_string(),
    })?;
    index.replace_children(path, entities)
}

/// Select the endpoint satisfying a read of `path`. Reads never inherit:
/// the file itself must carry the endpoint.
pub fn resolve_read<'a>(index: &'a PathIndex, path: &str) -> Result<&'a ReadEndpoint, DoorError> {
    match index.lookup(path) {
        Some(Node::File(file)) => file
            .read
            .as_ref()
            .ok_or_else(|| DoorError::NoReadableEndpoint(path.to_owned())),
        _ => Err(DoorError::NotAFile(path.to_owned())),
    }
}

/// Select the endpoint satisfying a write to `path`.
///
/// A file-level write endpoint always wins; otherwise the enclosing
/// folder's endpoint is inherited, which is how uploading a name not yet
/// present in the tree is supported. A root-level new name has no
/// enclosing folder and fails.
pub fn resolve_write<'a>(index: &'a PathIndex, path: &str) -> Result<&'a WriteEndpoint, DoorError> {
    if let Some(Node::File(file)) = index.lookup(path) {
        if let Some(endpoint) = file.write.as_ref() {
            return Ok(endpoint);
        }
    }
    if let Some((parent, _)) = path.rsplit_once('/') {
        if !parent.is_empty() {
            if let Some(Node::Folder(folder)) = index.lookup(parent) {
                if let Some(endpoint) = folder.write.as_ref() {
                    return Ok(endpoint);
                }
            }
        }
    }
    Err(DoorError::NoWritableEndpoint(path.to_owned()))
}
