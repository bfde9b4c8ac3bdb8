// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use colored::*;
use csrf_referer::cli::Cli;
use csrf_referer::{HttpRequest, RawTransport, RefreshResult, TokenRefresher};
use log::info;
use simple_logger::SimpleLogger;
use std::fs;
use std::io::{self, Read, Write};
use std::time::Duration;

fn read_request(cli: &Cli) -> RefreshResult<Vec<u8>> {
    match &cli.request {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().lock().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

async fn run(cli: &Cli) -> RefreshResult<()> {
    let raw_request = read_request(cli)?;
    let config = cli.token_config()?;
    let service = cli.service_for(&raw_request)?;

    let transport = RawTransport::new(Duration::from_secs(config.timeout()));
    let refresher = TokenRefresher::new(config, transport);
    info!("{} {}", refresher.action_name(), env!("CARGO_PKG_VERSION"));

    let mut request = HttpRequest::new(service, raw_request);
    if refresher.perform_action(&mut request).await {
        eprintln!("{}", "Anti-CSRF token refreshed".green());
    } else {
        eprintln!("{}", "Request left unchanged".yellow());
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(request.request())?;
    stdout.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = SimpleLogger::new().with_level(cli.level_filter()).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(&cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
