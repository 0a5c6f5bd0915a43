//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `registrar_core` wiring: build
//!   the dispatcher, run the startup configuration check, open an in-memory
//!   database.
//! - Keep output deterministic for quick local sanity checks.

use registrar_core::db::open_db_in_memory;
use registrar_core::handlers::{build_dispatcher, request_contracts};
use registrar_core::logging::{default_log_level, init_logging, logging_status};

fn main() {
    println!("registrar_core ping={}", registrar_core::ping());
    println!("registrar_core version={}", registrar_core::core_version());

    let log_dir = std::env::temp_dir().join("registrar-logs");
    match init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        Ok(()) => {
            if let Some((level, dir)) = logging_status() {
                println!("logging level={level} dir={}", dir.display());
            }
        }
        Err(err) => eprintln!("logging init failed: {err}"),
    }

    let dispatcher = match build_dispatcher() {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            eprintln!("dispatcher build failed: {err}");
            std::process::exit(1);
        }
    };

    // Fail fast before any traffic: a missing registration is a process
    // start abort, never a per-request outcome.
    if let Err(err) = dispatcher.assert_configuration_valid(&request_contracts()) {
        eprintln!("configuration check failed: {err}");
        std::process::exit(1);
    }
    println!("configuration check=ok request_types={}", request_contracts().len());

    match open_db_in_memory() {
        Ok(_) => println!("database bootstrap=ok"),
        Err(err) => {
            eprintln!("database bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
