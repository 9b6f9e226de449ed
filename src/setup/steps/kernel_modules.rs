use std::{fs, path::Path};

use hex_literal::hex;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::{Ctx, SetupStep};

pub struct KernelModules;

impl KernelModules {
	pub const CONFIG_PATH: &'static str = "/etc/modules-load.d/k8s.conf";
	pub const CONFIG_TEXT: &'static str = "overlay\nbr_netfilter\n";
	pub const MODULES: &'static [&'static str] = &["overlay", "br_netfilter"];

	fn is_loaded(module: &str) -> bool {
		Path::new("/sys/module/").join(module).exists()
	}

	fn load(ctx: &Ctx, module: &str) -> Result<(), SetupError> {
		info!("Loading kernel module: {module}.");
		cmd::run(ctx, "modprobe", &[module])?;
		Ok(())
	}
}

const CONFIG_CHECKSUM: [u8; 32] =
	hex!("fcaf07413a456d658640930cef56ed4d13330123e3b522c481021613c64755e3");

impl SetupStep for KernelModules {
	fn name(&self) -> &'static str {
		"KernelModules"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		let Ok(config) = fs::read(Self::CONFIG_PATH) else {
			info!("Kernel module config missing or unreadable.");
			return Ok(false);
		};
		if Sha256::digest(&config)[..] != CONFIG_CHECKSUM {
			info!("Kernel modules are misconfigured.");
			return Ok(false);
		}
		for module in Self::MODULES {
			if !Self::is_loaded(module) {
				info!("Kernel module {module} not loaded.");
				return Ok(false);
			}
		}
		info!("Kernel modules are already configured and loaded.");
		Ok(true)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		info!("Configuring kernel modules.");
		fs::write(Self::CONFIG_PATH, Self::CONFIG_TEXT)?;
		for module in Self::MODULES {
			Self::load(ctx, module)?;
		}
		info!("Kernel modules have been configured and loaded.");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn the_config_text_matches_the_pinned_checksum() {
		assert_eq!(
			Sha256::digest(KernelModules::CONFIG_TEXT.as_bytes())[..],
			CONFIG_CHECKSUM,
		);
	}

	#[test]
	fn the_config_lists_every_required_module() {
		for module in KernelModules::MODULES {
			assert!(KernelModules::CONFIG_TEXT.lines().any(|line| line == *module));
		}
	}
}
