//! prbot CLI entrypoint for a discovery run.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use prbot::RunError;

/// Worker threads available to blocking work such as git clones.
const BLOCKING_POOL_SIZE: usize = 16;

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .max_blocking_threads(BLOCKING_POOL_SIZE)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => return report_failure(&RunError::from(error)),
    };

    match runtime.block_on(cli::run()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_failure(&error),
    }
}

fn report_failure(error: &RunError) -> ExitCode {
    if writeln!(io::stderr().lock(), "{error}").is_err() {
        return ExitCode::FAILURE;
    }
    ExitCode::FAILURE
}
