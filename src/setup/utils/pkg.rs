use std::process::Command;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::Ctx;

pub fn is_installed(package: &str) -> Result<bool, SetupError> {
	let output = Command::new("dpkg-query")
		.args(["-W", "-f=${Status}", package])
		.output()
		.map_err(|source| SetupError::CommandLaunch {
			cmd: format!("dpkg-query -W {package}"),
			source,
		})?;
	if !output.status.success() {
		return Ok(false);
	}
	let stdout = String::from_utf8_lossy(&output.stdout);
	let status = stdout.trim();
	Ok(status == "install ok installed" || status == "hold ok installed")
}

pub fn update(ctx: &Ctx) -> Result<(), SetupError> {
	cmd::run(ctx, "apt-get", &["update"])?;
	Ok(())
}

pub fn install(ctx: &Ctx, packages: &[&str]) -> Result<(), SetupError> {
	let mut args = vec!["install", "-y", "--no-install-recommends"];
	args.extend_from_slice(packages);
	cmd::run(ctx, "apt-get", &args)?;
	Ok(())
}

/// Exact-version install. Fails with `PackageNotFound` when the pinned version
/// is absent from the configured repositories.
pub fn install_pinned(ctx: &Ctx, package: &str, version: &str) -> Result<(), SetupError> {
	let listing = cmd::run(ctx, "apt-cache", &["madison", package])?;
	if !has_version(&listing, version) {
		return Err(SetupError::PackageNotFound {
			package: package.to_owned(),
			version: version.to_owned(),
		});
	}
	let pin = format!("{package}={version}");
	install(ctx, &[pin.as_str()])
}

/// Best-effort removal: the outcome is reported, never raised.
pub fn remove(ctx: &Ctx, package: &str) -> Result<bool, SetupError> {
	Ok(cmd::try_run(ctx, "apt-get", &["remove", "-y", package])?.is_some())
}

pub fn hold(ctx: &Ctx, packages: &[&str]) -> Result<(), SetupError> {
	let mut args = vec!["hold"];
	args.extend_from_slice(packages);
	cmd::run(ctx, "apt-mark", &args)?;
	Ok(())
}

/// `apt-cache madison` prints one "package | version | source" row per
/// candidate version.
fn has_version(listing: &str, version: &str) -> bool {
	listing
		.lines()
		.filter_map(|line| line.split('|').nth(1))
		.any(|field| field.trim() == version)
}
