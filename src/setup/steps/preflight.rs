use std::fs;

use tracing::info;

use crate::error::SetupError;
use crate::setup::{Ctx, SetupStep};

pub struct Preflight;

impl Preflight {
	pub const OS_RELEASE_PATH: &'static str = "/etc/os-release";
}

impl SetupStep for Preflight {
	fn name(&self) -> &'static str {
		"Preflight"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		Ok(false)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		let os_release = fs::read_to_string(Self::OS_RELEASE_PATH)?;
		verify(&os_release, ctx.config.ubuntu_version)?;
		info!("Host platform is Ubuntu {}.", ctx.config.ubuntu_version);
		Ok(())
	}
}

/// Compare the host identification against the supported platform. Runs before
/// any mutating step.
fn verify(os_release: &str, expected_version: &str) -> Result<(), SetupError> {
	let id = field(os_release, "ID").unwrap_or_default();
	let version = field(os_release, "VERSION_ID").unwrap_or_default();
	if id != "ubuntu" || version != expected_version {
		return Err(SetupError::UnsupportedPlatform {
			expected: format!("ubuntu {expected_version}"),
			found: format!("{id} {version}").trim().to_owned(),
		});
	}
	Ok(())
}

/// Read one `KEY=value` field, stripping optional quotes.
fn field(os_release: &str, key: &str) -> Option<String> {
	os_release.lines().find_map(|line| {
		let (name, value) = line.split_once('=')?;
		(name == key).then(|| value.trim().trim_matches('"').to_owned())
	})
}
