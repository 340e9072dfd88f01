// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Flattened path-to-node index over a user's entity tree.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::collections::HashMap;

use crate::entity::Entity;
use crate::endpoint::{ReadEndpoint, WriteEndpoint};
use crate::DoorError;

/// Flattened session-state form of a user's entity tree.
///
/// The primary store maps every absolute path (`/a/b`) to the node at that
/// path; folder nodes carry the ordered names of their children, whose own
/// nodes live one segment deeper. The root path `/` is never a key: the
/// implicit root is the ordered list of root child names.
///
/// Invariant: for every folder node at path `P`, each listed child `c` has
/// an entry at `P/c`, recursively, so the index is always a complete
/// flattening of the current tree. Subtree replacement restores the
/// invariant under a single `&mut` borrow, so no reader can observe a
/// partially updated index.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    nodes: HashMap<String, Node>,
    root_children: Vec<String>,
}

/// Node occupying one path in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A virtual file.
    File(FileNode),
    /// A virtual folder, static or dynamic.
    Folder(FolderNode),
}

/// Flattened file node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// Advisory size reported in listings and stat.
    pub size_bytes: u64,
    /// Endpoint producing the file's bytes.
    pub read: Option<ReadEndpoint>,
    /// Per-file write endpoint, taking precedence over the folder's.
    pub write: Option<WriteEndpoint>,
}

/// Flattened folder node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FolderNode {
    /// Ordered child names; each has a node one segment deeper.
    pub children: Vec<String>,
    /// Child-list endpoint; present on dynamic folders and never cleared.
    pub read: Option<ReadEndpoint>,
    /// Write endpoint inherited by uploads of new names under this folder.
    pub write: Option<WriteEndpoint>,
}

impl PathIndex {
    /// Build a complete index by a depth-first walk of the entity tree.
    pub fn build(entities: Vec<Entity>) -> Self {
        let mut index = Self::default();
        index.root_children = index.index_entities("", entities);
        index
    }

    /// Look up the node at an absolute path. Exact string match; `/` is
    /// never present and must be special-cased by callers.
    pub fn lookup(&self, path: &str) -> Option<&Node> {
        self.nodes.get(path)
    }

    /// True if a node occupies the path.
    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Ordered names of the implicit root's children.
    pub fn root_children(&self) -> &[String] {
        &self.root_children
    }

    /// Number of indexed nodes (the root is not counted).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no entities are indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace the children of the folder at `path` with freshly decoded
    /// entities, discarding every index entry under the old subtree and
    /// re-indexing the new one. The folder's own entry survives with its
    /// endpoints intact. On error nothing is modified.
    pub fn replace_children(&mut self, path: &str, entities: Vec<Entity>) -> Result<(), DoorError> {
        match self.nodes.get(path) {
            Some(Node::Folder(_)) => {}
            Some(Node::File(_)) => return Err(DoorError::NotAFolder(path.to_owned())),
            None => return Err(DoorError::PathNotFound(path.to_owned())),
        }
        let prefix = format!("{path}/");
        self.nodes.retain(|existing, _| !existing.starts_with(&prefix));
        let names = self.index_entities(path, entities);
        if let Some(Node::Folder(folder)) = self.nodes.get_mut(path) {
            folder.children = names;
        }
        Ok(())
    }

    /// Insert `entities` under `parent` ("" for the root), returning the
    /// ordered child names. A later sibling sharing an earlier one's name
    /// wins the map entry; the earlier node and any of its descendants are
    /// dropped so the flattening stays complete.
    fn index_entities(&mut self, parent: &str, entities: Vec<Entity>) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(entities.len());
        for entity in entities {
            let name = entity.name().to_owned();
            let path = format!("{parent}/{name}");
            if self.nodes.remove(&path).is_some() {
                let prefix = format!("{path}/");
                self.nodes.retain(|existing, _| !existing.starts_with(&prefix));
            }
            match entity {
                Entity::File(file) => {
                    self.nodes.insert(
                        path,
                        Node::File(FileNode {
                            size_bytes: file.size_bytes,
                            read: file.read,
                            write: file.write,
                        }),
                    );
                }
                Entity::Folder(folder) => {
                    let children = self.index_entities(&path, folder.children);
                    self.nodes.insert(
                        path,
                        Node::Folder(FolderNode {
                            children,
                            read: folder.read,
                            write: folder.write,
                        }),
                    );
                }
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
