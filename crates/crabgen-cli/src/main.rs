//! Crabgen code generator executable.
//!
//! This is the main executable for the crabgen C lowering pipeline. It
//! demonstrates the pipeline by running it over a handful of hand-built
//! fixture programs rather than parsing real source files — this crate
//! owns no front-end, so [`crabgen::Context`] values arrive already
//! built and name-bound.
//!
//! # Current Implementation
//!
//! The current implementation serves as a test harness and demonstration
//! of the generator's capabilities. It:
//!
//! 1. Sets up logging for error reporting
//! 2. Builds the named fixture [`crabgen::Context`] for each argument
//! 3. Runs the [`crabgen::Driver`] over it
//! 4. Writes the resulting `.h`/`.c` pair to disk
//! 5. Reports any lowering errors with detailed diagnostics
//!
//! # Error Reporting
//!
//! All lowering errors are displayed using rich diagnostic output via
//! [`CodeSpanReportGenerator`], which provides:
//! - Source code location highlighting
//! - Error context and suggestions
//! - Color-coded terminal output
//!
//! # Future Development
//!
//! This executable will evolve to:
//! - Accept a real front-end's `Context` instead of fixtures
//! - Support an output directory flag
//! - Provide generation options and flags

mod fixtures;

use std::process::exit;

use crabgen::{CodeSpanReportGenerator, Driver, ReportGenerator};
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelPadding, TermLogger, TerminalMode, ThreadLogMode};

/// Main entry point for the crabgen generator demo.
///
/// Builds a fixture [`crabgen::Context`] per command-line argument and
/// demonstrates the complete lowering pipeline from bound program data to
/// GObject-flavored C.
///
/// # Process Flow
///
/// 1. **Logging Setup**: configure error-level logging with color output
/// 2. **Argument Processing**: read fixture names from command line arguments
/// 3. **Lowering**: run the [`Driver`] over each fixture's context
/// 4. **Error Handling**: display rich diagnostics for any lowering errors
///
/// # Usage
///
/// ```text
/// crabgen counter
/// ```
fn main() {
    let config = ConfigBuilder::new()
        .set_location_level(LevelFilter::Error)
        .set_thread_mode(ThreadLogMode::Both)
        .set_level_padding(LevelPadding::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    CombinedLogger::init(vec![TermLogger::new(LevelFilter::Error, config, TerminalMode::Mixed, ColorChoice::Auto)]).unwrap();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} fixture1 fixture2 ...", args[0]);
        exit(1);
    }

    let driver = Driver::new();

    // Lower each fixture in turn.
    for fixture_name in &args[1..] {
        let build = match fixtures::lookup(fixture_name) {
            Some(build) => build,
            None => {
                eprintln!("Unknown fixture: {fixture_name}");
                exit(1);
            }
        };

        let mut context = build();

        match driver.run(&mut context) {
            Ok(files) => {
                for file in &files {
                    if let Err(error) = std::fs::write(&file.path, &file.contents) {
                        eprintln!("Error writing file {}: {error}", file.path);
                        exit(1);
                    }
                }
                println!("Compilation successful: {fixture_name}");
            }
            Err((error, partial_files)) => {
                for file in &partial_files {
                    let _ = std::fs::write(&file.path, &file.contents);
                }
                CodeSpanReportGenerator::generate(&error);
                exit(1);
            }
        }
    }
}
