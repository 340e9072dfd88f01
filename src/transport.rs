// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Blocking HTTP transport primitive behind a trait seam.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Response body captured by a transport call. The status is reported but
/// never acted on by this crate: a non-success body is still a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBody {
    /// HTTP status code of the response.
    pub status: u16,
    /// Raw response bytes.
    pub bytes: Vec<u8>,
}

/// Failures below the HTTP layer: connection, TLS, or body I/O problems.
/// Status codes are not failures at this level.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be performed at all.
    #[error("request failed: {0}")]
    Request(#[source] Box<ureq::Error>),
    /// The response body could not be read.
    #[error("reading response body failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Opaque "perform HTTP request" primitive. Calls are synchronous and
/// blocking; they stall only the calling session's own request cycle.
pub trait HttpTransport: Send + Sync {
    /// Perform `method url` with an empty request body and drain the
    /// response body.
    fn perform(&self, method: &str, url: &str) -> Result<HttpBody, TransportError>;

    /// POST `data` to `url` as a multipart form body with a single file
    /// field named `field_name` carrying `file_name`. Returns the response
    /// status.
    fn upload(
        &self,
        url: &str,
        field_name: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<u16, TransportError>;
}

/// Production transport backed by `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl HttpTransport for UreqTransport {
    fn perform(&self, method: &str, url: &str) -> Result<HttpBody, TransportError> {
        let response = unwrap_status(ureq::request(method, url).call())?;
        let status = response.status();
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        Ok(HttpBody { status, bytes })
    }

    fn upload(
        &self,
        url: &str,
        field_name: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<u16, TransportError> {
        let boundary = fresh_boundary();
        let body = multipart_body(&boundary, field_name, file_name, data);
        let response = unwrap_status(
            ureq::post(url)
                .set(
                    "Content-Type",
                    &format!("multipart/form-data; boundary={boundary}"),
                )
                .send_bytes(&body),
        )?;
        Ok(response.status())
    }
}

/// ureq reports non-2xx responses as errors; fold those back into plain
/// responses so status handling remains a policy of the caller.
fn unwrap_status(
    outcome: Result<ureq::Response, ureq::Error>,
) -> Result<ureq::Response, TransportError> {
    match outcome {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(_, response)) => Ok(response),
        Err(err) => Err(TransportError::Request(Box::new(err))),
    }
}

fn fresh_boundary() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let serial = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("http-door-{nanos:x}-{serial:x}")
}

fn multipart_body(boundary: &str, field_name: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
