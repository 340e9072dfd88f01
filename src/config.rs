// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Per-user configuration loading and the startup registry.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::entity::{decode_entities, Entity, EntityDescription};
use crate::index::PathIndex;
use crate::DoorError;

/// One user's credentials and private virtual tree, built once at load
/// time. `Clone` so each authenticating session takes an independent
/// snapshot of the index.
#[derive(Debug, Clone)]
pub struct UserConfig {
    /// Login name, derived from the configuration file's stem.
    pub username: String,
    /// Cleartext password checked at authentication time.
    pub password: String,
    /// Flattened index over the user's root entities.
    pub index: PathIndex,
}

impl UserConfig {
    /// Build a configuration from already-decoded entities.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        entities: Vec<Entity>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            index: PathIndex::build(entities),
        }
    }
}

/// Username-keyed registry of user configurations. Read-only after
/// startup, so lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    users: HashMap<String, UserConfig>,
}

/// Wire shape of one configuration file. The username lives in the file
/// name, not the document, so a declared `Username` member is ignored.
#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "Entities", default)]
    entities: Vec<EntityDescription>,
}

impl Registry {
    /// Empty registry, populated programmatically (used by hosts that
    /// manage configuration themselves, and by tests).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one user's configuration.
    pub fn insert(&mut self, config: UserConfig) {
        self.users.insert(config.username.clone(), config);
    }

    /// Look up a user's configuration.
    pub fn get(&self, username: &str) -> Option<&UserConfig> {
        self.users.get(username)
    }

    /// Number of configured users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True when no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Iterate the configurations in unspecified order.
    pub fn configs(&self) -> impl Iterator<Item = &UserConfig> {
        self.users.values()
    }

    /// Load every `<username>.json` file inside `path`. Subdirectories and
    /// entries without a `.json` extension (case-insensitive) are skipped;
    /// anything else that fails to read or decode is fatal.
    pub fn load_dir(path: &Path) -> Result<Self, DoorError> {
        let metadata = fs::metadata(path)
            .map_err(|_| DoorError::ConfigurationNotFound(path.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(DoorError::ConfigurationNotADirectory(path.to_path_buf()));
        }

        let mut registry = Self::new();
        let entries = fs::read_dir(path).map_err(|source| DoorError::ConfigurationIo {
            path: path.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| DoorError::ConfigurationIo {
                path: path.to_path_buf(),
                source,
            })?;
            let file_path = entry.path();
            if file_path.is_dir() || !has_json_extension(&file_path) {
                debug!("skipping non-configuration entry {}", file_path.display());
                continue;
            }
            let Some(username) = file_path.file_stem().and_then(|stem| stem.to_str()) else {
                debug!("skipping non-UTF-8 file name {}", file_path.display());
                continue;
            };
            let config = load_file(&file_path, username)?;
            info!(
                "loaded configuration for {} ({} entities)",
                config.username,
                config.index.len()
            );
            registry.insert(config);
        }
        Ok(registry)
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .map(|extension| extension.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn load_file(path: &Path, username: &str) -> Result<UserConfig, DoorError> {
    let contents = fs::read(path).map_err(|source| DoorError::ConfigurationIo {
        path: path.to_path_buf(),
        source,
    })?;
    let document: ConfigDocument =
        serde_json::from_slice(&contents).map_err(|err| DoorError::ConfigurationInvalid {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
    let entities =
        decode_entities(document.entities).map_err(|err| DoorError::ConfigurationInvalid {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
    Ok(UserConfig::new(username, document.password, entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("http-door-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn loads_users_from_json_files_only() {
        let dir = scratch_dir("load");
        fs::write(
            dir.join("alice.json"),
            r#"{"Password":"secret","Entities":[
                {"Name":"report.txt","File":{"Size":42,"Endpoint":{
                    "Read":{"Method":"GET","URL":"http://host/report"}}}}]}"#,
        )
        .expect("write alice");
        fs::write(
            dir.join("bob.JSON"),
            r#"{"Password":"hunter2","Entities":[]}"#,
        )
        .expect("write bob");
        fs::write(dir.join("notes.txt"), "not a configuration").expect("write notes");
        fs::create_dir_all(dir.join("nested.json")).expect("create decoy dir");

        let registry = Registry::load_dir(&dir).expect("load");
        assert_eq!(registry.len(), 2);
        let alice = registry.get("alice").expect("alice");
        assert_eq!(alice.password, "secret");
        assert_eq!(alice.index.len(), 1);
        let bob = registry.get("bob").expect("bob from uppercase extension");
        assert!(bob.index.is_empty());
        assert!(registry.get("notes").is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn declared_username_member_is_ignored() {
        let dir = scratch_dir("stem");
        fs::write(
            dir.join("carol.json"),
            r#"{"Username":"imposter","Password":"pw","Entities":[]}"#,
        )
        .expect("write carol");

        let registry = Registry::load_dir(&dir).expect("load");
        assert!(registry.get("carol").is_some());
        assert!(registry.get("imposter").is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("broken.json"), "{not json").expect("write broken");

        let err = Registry::load_dir(&dir).unwrap_err();
        assert!(matches!(err, DoorError::ConfigurationInvalid { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_entity_shape_is_fatal() {
        let dir = scratch_dir("shape");
        fs::write(
            dir.join("dave.json"),
            r#"{"Password":"pw","Entities":[{"Name":"x"}]}"#,
        )
        .expect("write dave");

        let err = Registry::load_dir(&dir).unwrap_err();
        assert!(matches!(err, DoorError::ConfigurationInvalid { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_or_non_directory_paths_are_rejected() {
        let missing = std::env::temp_dir().join("http-door-definitely-missing");
        let _ = fs::remove_dir_all(&missing);
        assert!(matches!(
            Registry::load_dir(&missing),
            Err(DoorError::ConfigurationNotFound(_))
        ));

        let dir = scratch_dir("notdir");
        let file = dir.join("plain.json");
        fs::write(&file, r#"{"Password":"pw"}"#).expect("write file");
        assert!(matches!(
            Registry::load_dir(&file),
            Err(DoorError::ConfigurationNotADirectory(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }
}
