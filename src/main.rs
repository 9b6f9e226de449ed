mod cli;
mod config;
mod error;
mod logging;
mod runlog;
mod setup;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use crate::config::RunConfig;
use crate::runlog::RunLog;
use crate::setup::Ctx;

fn main() -> ExitCode {
	let args = cli::Cli::parse();
	logging::init(args.verbose);
	let config = RunConfig::new(args.role(), args.verbose);
	info!("Kubernetes node setup started ({:?} role).", config.role);
	let log = match RunLog::create() {
		Ok(log) => log,
		Err(err) => {
			error!("Failed to allocate the run log: {err}");
			return ExitCode::FAILURE;
		}
	};
	let ctx = Ctx {
		config: &config,
		log: &log,
	};
	if let Err(err) = setup::run(&ctx) {
		error!("Setup failed: {err}");
		eprintln!("--- captured run log ({}) ---", log.path().display());
		if let Err(dump_err) = log.dump(&mut io::stderr()) {
			error!("Failed to dump the run log: {dump_err}");
		}
		return ExitCode::FAILURE;
	}
	if config.verbose {
		let _ = log.dump(&mut io::stdout());
	}
	info!("Kubernetes node setup finished successfully.");
	ExitCode::SUCCESS
}
