use tracing::info;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::{Ctx, SetupStep};

pub struct Services;

impl Services {
	/// Container runtime first; the kubelet sits on top of it.
	pub const SERVICES: &'static [&'static str] = &["containerd", "kubelet"];
}

impl SetupStep for Services {
	fn name(&self) -> &'static str {
		"Services"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		for &service in Self::SERVICES {
			let enabled = cmd::probe("systemctl", &["is-enabled", "--quiet", service]);
			let active = cmd::probe("systemctl", &["is-active", "--quiet", service]);
			if !enabled || !active {
				info!("Service {service} is not enabled and active.");
				return Ok(false);
			}
		}
		Ok(true)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		cmd::run(ctx, "systemctl", &["daemon-reload"])?;
		for &service in Self::SERVICES {
			info!("Enabling and starting {service}.");
			cmd::run(ctx, "systemctl", &["enable", "--now", service])?;
			cmd::run(ctx, "systemctl", &["restart", service])?;
		}
		Ok(())
	}
}
