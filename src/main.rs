use std::process::ExitCode;

use clap::Parser;

use work_hours::cli::{report_failure, run, Args};
use work_hours::config::load_dotenv;

fn main() -> ExitCode {
    match load_dotenv().and_then(|_| run(Args::parse())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e, &mut std::io::stderr()),
    }
}
