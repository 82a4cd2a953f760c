#![forbid(unsafe_code)]

use std::time::Duration;

use anyhow::Result;
use log::{info, error};
use poem::listener::TcpListener;

// Server Utilities
use crate::api::make_app;
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx};
use crate::utils::errors::Errors;

// Modules
mod api;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "WriterLlmServer"; // for poem logging

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<()> {
    // --------------- Initialize Server --------------
    // Announce ourselves.
    println!("Starting writer_llm!");

    // Initialize the server.
    let runtime_ctx = server_init()?;
    let config = &runtime_ctx.parms.config;

    // --------------- Main Loop Set Up ---------------
    // Assign base URL.
    let server_url = format!("{}:{}", config.http_addr, config.http_port);
    let app = make_app(&config.title, &server_url);

    // ------------------ Main Loop -------------------
    let addr = format!("{}{}", "0.0.0.0:", config.http_port);
    info!("Listening on {}, advertised as {}.", addr, server_url);
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run_with_graceful_shutdown(
            app,
            shutdown_signal(),
            Some(Duration::from_secs(config.shutdown_timeout_secs)),
        )
        .await?;

    info!("{} stopped.", SERVER_NAME);
    Ok(())
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// server_init:
// ---------------------------------------------------------------------------
/** Initialize logging and read the runtime context before the main loop
 * processor is configured.
 */
fn server_init() -> Result<RuntimeCtx> {
    // Configure our log.
    init_log()?;

    // Read input parameters and the configuration file.
    let runtime_ctx = init_runtime_context()?;
    info!("{}", Errors::InputParms(format!("{:#?}", runtime_ctx)));

    // Log build info.
    print_version_info();

    Ok(runtime_ctx)
}

// ---------------------------------------------------------------------------
// shutdown_signal:
// ---------------------------------------------------------------------------
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received."),
        Err(e) => error!("Unable to listen for the shutdown signal, stopping: {}", e),
    }
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    // Log build info.
    info!("\n*** Running WRITER_LLM={}, BRANCH={}, COMMIT={}, DIRTY={}, RUSTC={}.",
          option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
          env!("GIT_BRANCH"),
          env!("GIT_COMMIT_SHORT"),
          env!("GIT_DIRTY"),
          env!("RUSTC_VERSION"),
    );
}
