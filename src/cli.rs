// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Command-line surface for inspecting http-door configurations.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::warn;

use crate::config::Registry;
use crate::index::{Node, PathIndex};
use crate::resolve::resolve_folder;
use crate::transport::{HttpTransport, UreqTransport};

/// Inspection utilities for http-door virtual filesystems. The protocol
/// engine binding lives outside this crate; these commands validate and
/// preview the trees it would serve.
#[derive(Parser)]
#[command(name = "http-door", about = "Inspect http-door virtual filesystem configurations")]
struct Cli {
    /// Directory containing the per-user JSON configuration files.
    #[arg(long, default_value = "config")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Load every configuration and report the users found.
    Check,
    /// Print one user's virtual tree.
    Tree {
        /// User whose tree to print.
        username: String,
        /// Resolve dynamic folders over HTTP while printing.
        #[arg(long)]
        resolve: bool,
    },
}

/// Entry point for the CLI: parse arguments and dispatch.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Check => cmd_check(&cli.config),
        Cmd::Tree { username, resolve } => cmd_tree(&cli.config, &username, resolve),
    }
}

fn cmd_check(config_dir: &PathBuf) -> Result<()> {
    let registry = Registry::load_dir(config_dir)?;
    let mut configs: Vec<_> = registry.configs().collect();
    configs.sort_by(|a, b| a.username.cmp(&b.username));
    for config in &configs {
        println!("{}: {} entities", config.username, config.index.len());
    }
    println!("{} configuration(s) OK", registry.len());
    Ok(())
}

fn cmd_tree(config_dir: &PathBuf, username: &str, resolve: bool) -> Result<()> {
    let registry = Registry::load_dir(config_dir)?;
    let Some(config) = registry.get(username) else {
        bail!("no configuration for user: {username}");
    };
    // Work on a private snapshot, exactly as a session would.
    let mut index = config.index.clone();
    let transport = UreqTransport;
    println!("/");
    print_level(
        &mut index,
        resolve.then_some(&transport as &dyn HttpTransport),
        "",
        1,
    );
    Ok(())
}

enum Printed {
    File(u64),
    Folder { dynamic: bool },
    Missing,
}

fn print_level(
    index: &mut PathIndex,
    transport: Option<&dyn HttpTransport>,
    parent: &str,
    depth: usize,
) {
    let names: Vec<String> = if parent.is_empty() {
        index.root_children().to_vec()
    } else {
        match index.lookup(parent) {
            Some(Node::Folder(folder)) => folder.children.clone(),
            _ => return,
        }
    };
    for name in names {
        let path = format!("{parent}/{name}");
        let indent = "  ".repeat(depth);
        let printed = match index.lookup(&path) {
            Some(Node::File(file)) => Printed::File(file.size_bytes),
            Some(Node::Folder(folder)) => Printed::Folder {
                dynamic: folder.read.is_some(),
            },
            None => Printed::Missing,
        };
        match printed {
            Printed::File(size_bytes) => println!("{indent}{name}  ({size_bytes} bytes)"),
            Printed::Folder { dynamic } => {
                let marker = if dynamic { "  [dynamic]" } else { "" };
                println!("{indent}{name}/{marker}");
                if dynamic {
                    if let Some(transport) = transport {
                        if let Err(err) = resolve_folder(index, transport, &path) {
                            warn!("resolving {path} failed: {err}");
                        }
                    }
                }
                print_level(index, transport, &path, depth + 1);
            }
            Printed::Missing => {}
        }
    }
}
