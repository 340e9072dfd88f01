// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Binary entry point for the http-door inspection CLI.
// Author: Lukas Bower
#![forbid(unsafe_code)]

//! Entry point for the http-door binary.

fn main() {
    env_logger::init();
    if let Err(err) = http_door::cli::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
