// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Exercise the ureq transport against an in-process HTTP origin.
// Author: Lukas Bower
#![forbid(unsafe_code)]

mod support;

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;

use http_door::{FtpDriver, HttpDriverFactory, Registry, UreqTransport, UserConfig};
use support::entities;
use tiny_http::{Response, Server};

/// Captured upload request: content type header and raw body.
type Captured = (String, String);

fn spawn_origin() -> (u16, Arc<Mutex<Vec<Captured>>>) {
    let server = Server::http("127.0.0.1:0").expect("bind origin");
    let port = server
        .server_addr()
        .to_ip()
        .expect("ip listener")
        .port();
    let uploads = Arc::new(Mutex::new(Vec::new()));
    let captured = uploads.clone();
    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let url = request.url().to_owned();
            match url.as_str() {
                "/report" => {
                    let _ = request.respond(Response::from_string("quarterly numbers"));
                }
                "/live-list" => {
                    let _ = request.respond(Response::from_string(
                        r#"[{"Name":"a.txt","File":{"Size":5}}]"#,
                    ));
                }
                "/flaky" => {
                    let _ = request
                        .respond(Response::from_string("oops").with_status_code(500));
                }
                "/inbox" => {
                    let content_type = request
                        .headers()
                        .iter()
                        .find(|header| header.field.equiv("Content-Type"))
                        .map(|header| header.value.as_str().to_owned())
                        .unwrap_or_default();
                    let mut body = String::new();
                    let _ = request.as_reader().read_to_string(&mut body);
                    captured
                        .lock()
                        .expect("uploads lock")
                        .push((content_type, body));
                    let _ =
                        request.respond(Response::from_string("created").with_status_code(201));
                }
                _ => {
                    let _ =
                        request.respond(Response::from_string("missing").with_status_code(404));
                }
            }
        }
    });
    (port, uploads)
}

fn driver_on(port: u16) -> http_door::HttpDriver {
    let base = format!("http://127.0.0.1:{port}");
    let config = UserConfig::new(
        "alice",
        "secret",
        entities(&format!(
            r#"[
            {{"Name":"report.txt","File":{{"Size":42,"Endpoint":{{
                "Read":{{"Method":"GET","URL":"{base}/report"}}}}}}}},
            {{"Name":"flaky.txt","File":{{"Size":4,"Endpoint":{{
                "Read":{{"Method":"GET","URL":"{base}/flaky"}}}}}}}},
            {{"Name":"live","Folder":{{"Endpoint":{{
                "Read":{{"Method":"GET","URL":"{base}/live-list"}}}}}}}},
            {{"Name":"inbox","Folder":{{"Endpoint":{{
                "Write":{{"URL":"{base}/inbox","Parameter":"upload"}}}}}}}}]"#
        )),
    );
    let mut registry = Registry::new();
    registry.insert(config);
    HttpDriverFactory::new(Arc::new(registry), Arc::new(UreqTransport)).new_driver()
}

#[test]
fn full_session_over_real_http() {
    let (port, uploads) = spawn_origin();
    let mut driver = driver_on(port);

    assert!(driver.authenticate("alice", "secret"));

    // Static read.
    assert_eq!(
        driver.get_file("/report.txt").expect("report body"),
        b"quarterly numbers"
    );

    // Non-success statuses are not failures: the body still flows.
    assert_eq!(driver.get_file("/flaky.txt").expect("flaky body"), b"oops");

    // Dynamic folder resolution over the wire.
    assert!(driver.change_dir("/live"));
    assert_eq!(driver.size_bytes("/live/a.txt"), Some(5));

    // Multipart upload through the folder's write endpoint.
    assert!(driver.put_file("/inbox/notes.txt", b"remember the milk"));
    let captured = uploads.lock().expect("uploads lock");
    let (content_type, body) = captured.first().expect("one upload");
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert!(body.contains("name=\"upload\""));
    assert!(body.contains("filename=\"notes.txt\""));
    assert!(body.contains("remember the milk"));
}

#[test]
fn connection_errors_surface_as_negative_outcomes() {
    // Nothing listens on this port; the OS refuses the connection.
    let mut driver = driver_on(1);

    assert!(driver.authenticate("alice", "secret"));
    assert!(driver.get_file("/report.txt").is_none());
    assert!(!driver.change_dir("/live"));
    assert!(!driver.put_file("/inbox/notes.txt", b"x"));
}
