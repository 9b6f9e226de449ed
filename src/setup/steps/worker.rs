use tracing::info;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::{Ctx, SetupStep};

pub struct WorkerCheck;

impl WorkerCheck {
	pub const SERVICE: &'static str = "containerd";
}

impl SetupStep for WorkerCheck {
	fn name(&self) -> &'static str {
		"WorkerCheck"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		Ok(false)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		ctx.log.note(&format!("checking service {}", Self::SERVICE))?;
		if !cmd::probe("systemctl", &["is-active", "--quiet", Self::SERVICE]) {
			return Err(SetupError::ServiceNotActive {
				service: Self::SERVICE.to_owned(),
			});
		}
		info!("Service {} is active.", Self::SERVICE);
		println!("This worker is provisioned. To join it to a cluster, run the join");
		println!("command printed by the control-plane setup with sudo. A fresh join");
		println!("command can be generated on the control-plane node with:");
		println!("  kubeadm token create --print-join-command");
		Ok(())
	}
}
