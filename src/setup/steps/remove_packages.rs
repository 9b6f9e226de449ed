use tracing::{info, warn};

use crate::error::SetupError;
use crate::setup::utils::pkg;
use crate::setup::{Ctx, SetupStep};

pub struct RemovePackages;

impl RemovePackages {
	/// Runtimes and tooling that conflict with the pinned stack.
	pub const CONFLICTING: &'static [&'static str] = &[
		"docker.io",
		"docker-doc",
		"docker-compose",
		"podman-docker",
		"containerd",
		"runc",
	];
}

impl SetupStep for RemovePackages {
	fn name(&self) -> &'static str {
		"RemovePackages"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		for package in Self::CONFLICTING {
			if pkg::is_installed(package)? {
				info!("Conflicting package {package} is installed.");
				return Ok(false);
			}
		}
		Ok(true)
	}

	// Best-effort: "not installed" and failed removals are not fatal.
	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		for package in Self::CONFLICTING {
			if !pkg::is_installed(package)? {
				continue;
			}
			if pkg::remove(ctx, package)? {
				info!("Removed conflicting package {package}.");
			} else {
				warn!("Failed to remove conflicting package {package}, continuing.");
			}
		}
		Ok(())
	}
}
