// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Shared fixtures for http-door integration tests.
// Author: Lukas Bower
#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use http_door::{
    Entity, EntityDescription, HttpBody, HttpDriver, HttpDriverFactory, HttpTransport, Registry,
    TransportError, UserConfig,
};

/// Scripted transport: URLs either answer with a canned body or fail at
/// the connection level. Every call is recorded for assertions.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, Option<Vec<u8>>>>,
    pub performed: Mutex<Vec<(String, String)>>,
    pub uploads: Mutex<Vec<UploadRecord>>,
}

/// One recorded upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    pub url: String,
    pub field_name: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `body` and status 200.
    pub fn respond(&self, url: &str, body: &[u8]) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(url.to_owned(), Some(body.to_vec()));
    }

    /// Make `url` fail with a connection error.
    pub fn fail(&self, url: &str) {
        self.responses
            .lock()
            .expect("responses lock")
            .insert(url.to_owned(), None);
    }

    pub fn performed_urls(&self) -> Vec<String> {
        self.performed
            .lock()
            .expect("performed lock")
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }

    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().expect("uploads lock").clone()
    }
}

fn refused() -> TransportError {
    TransportError::Io(io::Error::new(
        io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

impl HttpTransport for MockTransport {
    fn perform(&self, method: &str, url: &str) -> Result<HttpBody, TransportError> {
        self.performed
            .lock()
            .expect("performed lock")
            .push((method.to_owned(), url.to_owned()));
        match self.responses.lock().expect("responses lock").get(url) {
            Some(Some(bytes)) => Ok(HttpBody {
                status: 200,
                bytes: bytes.clone(),
            }),
            Some(None) | None => Err(refused()),
        }
    }

    fn upload(
        &self,
        url: &str,
        field_name: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<u16, TransportError> {
        if let Some(None) = self.responses.lock().expect("responses lock").get(url) {
            return Err(refused());
        }
        self.uploads.lock().expect("uploads lock").push(UploadRecord {
            url: url.to_owned(),
            field_name: field_name.to_owned(),
            file_name: file_name.to_owned(),
            data: data.to_vec(),
        });
        Ok(201)
    }
}

/// Decode entities from the same JSON shape the loader accepts.
pub fn entities(raw: &str) -> Vec<Entity> {
    let descriptions: Vec<EntityDescription> = serde_json::from_str(raw).expect("valid json");
    http_door::entity::decode_entities(descriptions).expect("decode")
}

/// Driver bound to a single-user registry over the supplied transport.
pub fn driver_for(config: UserConfig, transport: Arc<MockTransport>) -> HttpDriver {
    let mut registry = Registry::new();
    registry.insert(config);
    HttpDriverFactory::new(Arc::new(registry), transport).new_driver()
}
