// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: FTP driver callback contract and its HTTP-backed implementation.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::SystemTime;

use log::{info, warn};

use crate::config::Registry;
use crate::index::{Node, PathIndex};
use crate::resolve::{resolve_folder, resolve_read, resolve_write};
use crate::transport::HttpTransport;

/// One listing row handed to the protocol engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name.
    pub name: String,
    /// True for folders.
    pub is_dir: bool,
    /// Advisory file size; folders report zero.
    pub size_bytes: u64,
}

/// Callback contract invoked by the host protocol engine, one driver per
/// accepted connection. Every error is recovered internally and surfaced
/// only as the boolean, empty, or `None` shape the engine accepts;
/// detailed causes are logged.
pub trait FtpDriver {
    /// Bind the connection to a user. Returns false for unknown users and
    /// wrong passwords alike; the distinction is only logged.
    fn authenticate(&mut self, username: &str, password: &str) -> bool;

    /// Enter a directory. True unconditionally for `/`; false for files
    /// and unknown paths. Entering a dynamic folder fetches and splices
    /// its children before returning.
    fn change_dir(&mut self, path: &str) -> bool;

    /// List a directory's current children in declaration order. Unknown
    /// paths yield an empty listing, not an error.
    fn dir_contents(&mut self, path: &str) -> Vec<DirEntry>;

    /// Advisory size of the file at `path`; `None` for folders and
    /// unknown paths.
    fn size_bytes(&mut self, path: &str) -> Option<u64>;

    /// Modification time reported for any path. Virtual entities have no
    /// history, so this is always the current time.
    fn modified_time(&mut self, path: &str) -> SystemTime;

    /// Fetch a file's bytes through its read endpoint.
    fn get_file(&mut self, path: &str) -> Option<Vec<u8>>;

    /// Upload bytes through the resolved write endpoint.
    fn put_file(&mut self, path: &str, data: &[u8]) -> bool;

    /// Unsupported; always false.
    fn delete_file(&mut self, path: &str) -> bool;
    /// Unsupported; always false.
    fn delete_dir(&mut self, path: &str) -> bool;
    /// Unsupported; always false.
    fn rename(&mut self, from: &str, to: &str) -> bool;
    /// Unsupported; always false.
    fn make_dir(&mut self, path: &str) -> bool;
}

/// Per-connection session state bound at authentication time. The index
/// is an independent snapshot of the user's configuration: sessions never
/// share mutable state, so dynamic-folder resolution needs no locking.
#[derive(Debug)]
struct Session {
    username: String,
    index: PathIndex,
}

/// Driver backing the virtual filesystem with HTTP endpoints.
pub struct HttpDriver {
    registry: Arc<Registry>,
    transport: Arc<dyn HttpTransport>,
    session: Option<Session>,
}

impl HttpDriver {
    /// Username of the authenticated session, if any.
    pub fn authenticated_user(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.username.as_str())
    }
}

impl FtpDriver for HttpDriver {
    fn authenticate(&mut self, username: &str, password: &str) -> bool {
        info!("authenticate: {username}");
        let Some(config) = self.registry.get(username) else {
            warn!("no configuration for user {username}");
            return false;
        };
        if config.password != password {
            warn!("invalid password for user {username}");
            return false;
        }
        self.session = Some(Session {
            username: username.to_owned(),
            index: config.index.clone(),
        });
        true
    }

    fn change_dir(&mut self, path: &str) -> bool {
        info!("change directory: {path}");
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if path == "/" {
            return true;
        }
        let dynamic = match session.index.lookup(path) {
            Some(Node::Folder(folder)) => folder.read.is_some(),
            Some(Node::File(_)) | None => return false,
        };
        if !dynamic {
            return true;
        }
        match resolve_folder(&mut session.index, self.transport.as_ref(), path) {
            Ok(()) => true,
            Err(err) => {
                warn!("resolving dynamic folder {path} failed: {err}");
                false
            }
        }
    }

    fn dir_contents(&mut self, path: &str) -> Vec<DirEntry> {
        info!("listing: {path}");
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        if path == "/" {
            return entries(&session.index, "", session.index.root_children());
        }
        match session.index.lookup(path) {
            Some(Node::Folder(folder)) => entries(&session.index, path, &folder.children),
            Some(Node::File(_)) => {
                warn!("listing requested for file {path}");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn size_bytes(&mut self, path: &str) -> Option<u64> {
        info!("size: {path}");
        let session = self.session.as_ref()?;
        match session.index.lookup(path)? {
            Node::File(file) => Some(file.size_bytes),
            Node::Folder(_) => None,
        }
    }

    fn modified_time(&mut self, path: &str) -> SystemTime {
        info!("last modified: {path}");
        SystemTime::now()
    }

    fn get_file(&mut self, path: &str) -> Option<Vec<u8>> {
        info!("transmit file request: {path}");
        let session = self.session.as_ref()?;
        let endpoint = match resolve_read(&session.index, path) {
            Ok(endpoint) => endpoint.clone(),
            Err(err) => {
                warn!("read resolution for {path} failed: {err}");
                return None;
            }
        };
        info!("requesting {} {}", endpoint.method, endpoint.url);
        match self.transport.perform(&endpoint.method, &endpoint.url) {
            Ok(body) => {
                info!(
                    "transmit file: {path} ({} bytes, status {})",
                    body.bytes.len(),
                    body.status
                );
                Some(body.bytes)
            }
            Err(err) => {
                warn!("fetch for {path} failed: {err}");
                None
            }
        }
    }

    fn put_file(&mut self, path: &str, data: &[u8]) -> bool {
        info!("receive file request: {path} ({} bytes)", data.len());
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let endpoint = match resolve_write(&session.index, path) {
            Ok(endpoint) => endpoint.clone(),
            Err(err) => {
                warn!("write resolution for {path} failed: {err}");
                return false;
            }
        };
        let file_name = base_name(path);
        match self
            .transport
            .upload(&endpoint.url, &endpoint.field_name, file_name, data)
        {
            Ok(status) => {
                info!("upload for {path} accepted with status {status}");
                true
            }
            Err(err) => {
                warn!("upload for {path} failed: {err}");
                false
            }
        }
    }

    fn delete_file(&mut self, _path: &str) -> bool {
        false
    }

    fn delete_dir(&mut self, _path: &str) -> bool {
        false
    }

    fn rename(&mut self, _from: &str, _to: &str) -> bool {
        false
    }

    fn make_dir(&mut self, _path: &str) -> bool {
        false
    }
}

/// Creates one [`HttpDriver`] per accepted connection. The registry is
/// shared read-only; drivers clone a private index at authentication.
pub struct HttpDriverFactory {
    registry: Arc<Registry>,
    transport: Arc<dyn HttpTransport>,
}

impl HttpDriverFactory {
    /// Build a factory over a loaded registry and a transport.
    pub fn new(registry: Arc<Registry>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Create a fresh, unauthenticated driver for a new connection.
    pub fn new_driver(&self) -> HttpDriver {
        HttpDriver {
            registry: self.registry.clone(),
            transport: self.transport.clone(),
            session: None,
        }
    }
}

/// Final path segment, used as the uploaded file's form file name.
fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn entries(index: &PathIndex, parent: &str, names: &[String]) -> Vec<DirEntry> {
    names
        .iter()
        .filter_map(|name| {
            let path = format!("{parent}/{name}");
            index.lookup(&path).map(|node| match node {
                Node::File(file) => DirEntry {
                    name: name.clone(),
                    is_dir: false,
                    size_bytes: file.size_bytes,
                },
                Node::Folder(_) => DirEntry {
                    name: name.clone(),
                    is_dir: true,
                    size_bytes: 0,
                },
            })
        })
        .collect()
}
