use std::fs;

use hex_literal::hex;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::{Ctx, SetupStep};

pub struct Sysctl;

impl Sysctl {
	pub const CONFIG_PATH: &'static str = "/etc/sysctl.d/k8s.conf";
	pub const CONFIG_TEXT: &'static str = "net.bridge.bridge-nf-call-iptables = 1\n\
		net.bridge.bridge-nf-call-ip6tables = 1\n\
		net.ipv4.ip_forward = 1\n";
}

const CONFIG_CHECKSUM: [u8; 32] =
	hex!("6e3f751b8409493b80fb7154ee21989dece3322d8b9018157ffef64dfbc10799");

impl SetupStep for Sysctl {
	fn name(&self) -> &'static str {
		"Sysctl"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		let Ok(config) = fs::read(Self::CONFIG_PATH) else {
			info!("Sysctl config missing or unreadable.");
			return Ok(false);
		};
		if Sha256::digest(&config)[..] != CONFIG_CHECKSUM {
			info!("Sysctl is misconfigured.");
			return Ok(false);
		}
		info!("Sysctl already configured.");
		Ok(true)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		info!("Configuring sysctl.");
		fs::write(Self::CONFIG_PATH, Self::CONFIG_TEXT)?;
		cmd::run(ctx, "sysctl", &["--system"])?;
		info!("Sysctl has been configured.");
		Ok(())
	}
}
