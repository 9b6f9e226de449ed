use std::{fs, path::Path};

use tracing::info;

use crate::error::SetupError;
use crate::setup::utils::{cmd, pkg};
use crate::setup::{Ctx, SetupStep};

pub struct Containerd;

impl Containerd {
	pub const PACKAGE_NAME: &'static str = "containerd.io";
	pub const SERVICE_NAME: &'static str = "containerd";
	pub const CONFIG_PATH: &'static str = "/etc/containerd/config.toml";
	pub const APT_KEY_URL: &'static str = "https://download.docker.com/linux/ubuntu/gpg";
	pub const APT_KEY_PATH: &'static str = "/etc/apt/keyrings/docker.gpg";
	pub const APT_CONFIG_PATH: &'static str = "/etc/apt/sources.list.d/docker.list";
	pub const REPO_URL: &'static str = "https://download.docker.com/linux/ubuntu";
}

impl SetupStep for Containerd {
	fn name(&self) -> &'static str {
		"Containerd"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		if !pkg::is_installed(Self::PACKAGE_NAME)? {
			info!("Containerd is not installed.");
			return Ok(false);
		}
		if !Path::new(Self::CONFIG_PATH).exists() {
			info!("Containerd is not configured.");
			return Ok(false);
		}
		if !cmd::probe("systemctl", &["is-active", "--quiet", Self::SERVICE_NAME]) {
			info!("Containerd is not active.");
			return Ok(false);
		}
		Ok(true)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		info!(
			"Installing containerd {} from the Docker repository.",
			ctx.config.containerd_version
		);
		fs::create_dir_all("/etc/apt/keyrings")?;
		cmd::shell(
			ctx,
			&format!(
				"curl -fsSL {} | gpg --dearmor --yes -o {}",
				Self::APT_KEY_URL,
				Self::APT_KEY_PATH,
			),
		)?;
		let arch = cmd::run(ctx, "dpkg", &["--print-architecture"])?;
		let apt_config = format!(
			"deb [arch={} signed-by={}] {} {} stable\n",
			arch.trim(),
			Self::APT_KEY_PATH,
			Self::REPO_URL,
			ctx.config.ubuntu_codename,
		);
		fs::write(Self::APT_CONFIG_PATH, apt_config)?;
		pkg::update(ctx)?;
		pkg::install_pinned(ctx, Self::PACKAGE_NAME, ctx.config.containerd_version)?;
		fs::create_dir_all("/etc/containerd")?;
		info!("Generating default containerd config.");
		let default_config = cmd::run(ctx, "containerd", &["config", "default"])?;
		fs::write(Self::CONFIG_PATH, enable_systemd_cgroup(&default_config))?;
		info!("Restarting containerd service.");
		cmd::run(ctx, "systemctl", &["restart", Self::SERVICE_NAME])?;
		Ok(())
	}
}

/// The kubelet drives cgroups through systemd; containerd must agree.
fn enable_systemd_cgroup(config: &str) -> String {
	config.replace("SystemdCgroup = false", "SystemdCgroup = true")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn the_systemd_cgroup_driver_is_enabled() {
		let config = "[plugins.\"io.containerd.grpc.v1.cri\"]\n  SystemdCgroup = false\n";
		let updated = enable_systemd_cgroup(config);
		assert!(updated.contains("SystemdCgroup = true"));
		assert!(!updated.contains("SystemdCgroup = false"));
	}

	#[test]
	fn an_already_enabled_config_is_left_alone() {
		let config = "  SystemdCgroup = true\n";
		assert_eq!(enable_systemd_cgroup(config), config);
	}
}
