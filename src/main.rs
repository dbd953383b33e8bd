//
//  bitbucket-api
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_api::api::ApiError;
use bitbucket_api::cli::Cli;
use bitbucket_api::exit_codes;

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match cli.command.run(&cli.global).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("BB_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(error: &anyhow::Error) -> i32 {
    let api_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>());

    match api_error {
        Some(e) if e.is_validation() => exit_codes::USAGE,
        Some(ApiError::AuthFailed(_)) => exit_codes::AUTH_ERROR,
        Some(ApiError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(ApiError::RateLimited) => exit_codes::RATE_LIMIT,
        _ => exit_codes::ERROR,
    }
}
