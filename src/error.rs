use std::{io, process::ExitStatus, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
	#[error("I/O error: {0}.")]
	Io(#[from] io::Error),

	#[error("Failed to execute command '{cmd}': {source}")]
	CommandLaunch {
		cmd: String,
		#[source]
		source: io::Error,
	},

	#[error("Command failed: {cmd}")]
	CommandFailed {
		cmd: String,
		status: ExitStatus,
		stderr: Option<String>,
	},

	#[error("Unsupported platform: expected {expected}, found {found}.")]
	UnsupportedPlatform { expected: String, found: String },

	#[error("Package '{package}' has no version '{version}' in the configured repositories.")]
	PackageNotFound { package: String, version: String },

	#[error("Failed to detect the primary IPv4 address: {0}.")]
	NetworkDetection(String),

	#[error("Cluster nodes were not Ready within {}s.", .timeout.as_secs())]
	ReadinessTimeout { timeout: Duration },

	#[error("Version mismatch: client {client}, server {server}, requested {requested}.")]
	VersionMismatch {
		client: String,
		server: String,
		requested: String,
	},

	#[error("Smoke-test pod was not Ready within {}s.", .timeout.as_secs())]
	SmokeTestTimeout { timeout: Duration },

	#[error("Service '{service}' is not active.")]
	ServiceNotActive { service: String },

	#[error("Malformed version report: {0}.")]
	VersionReport(#[from] serde_json::Error),
}
