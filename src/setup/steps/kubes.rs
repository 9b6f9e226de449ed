use std::fs;

use tracing::info;

use crate::error::SetupError;
use crate::setup::utils::{cmd, pkg};
use crate::setup::{Ctx, SetupStep};

pub struct Kubes;

impl Kubes {
	pub const PACKAGE_NAMES: &'static [&'static str] = &["kubelet", "kubeadm", "kubectl"];
	pub const APT_CONFIG_PATH: &'static str = "/etc/apt/sources.list.d/kubernetes.list";
	pub const APT_KEY_PATH: &'static str = "/etc/apt/keyrings/kubernetes-apt-keyring.gpg";

	fn repo_url(minor: &str) -> String {
		format!("https://pkgs.k8s.io/core:/stable:/{minor}/deb")
	}
}

impl SetupStep for Kubes {
	fn name(&self) -> &'static str {
		"Kubes"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		for package in Self::PACKAGE_NAMES {
			if !pkg::is_installed(package)? {
				info!("{package} is not installed.");
				return Ok(false);
			}
		}
		info!("Kubernetes tooling is installed.");
		Ok(true)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		info!(
			"Installing Kubernetes {} tooling via apt-get.",
			ctx.config.kube_version
		);
		let repo_url = Self::repo_url(&ctx.config.kube_minor());
		fs::create_dir_all("/etc/apt/keyrings")?;
		cmd::shell(
			ctx,
			&format!(
				"curl -fsSL {}/Release.key | gpg --dearmor --yes -o {}",
				repo_url,
				Self::APT_KEY_PATH,
			),
		)?;
		let apt_config = format!("deb [signed-by={}] {} /\n", Self::APT_KEY_PATH, repo_url);
		fs::write(Self::APT_CONFIG_PATH, apt_config)?;
		pkg::update(ctx)?;
		let pin = ctx.config.kube_pkg_version();
		for package in Self::PACKAGE_NAMES {
			pkg::install_pinned(ctx, package, &pin)?;
		}
		pkg::hold(ctx, Self::PACKAGE_NAMES)?;
		info!("Kubernetes tooling installed and held.");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn the_repository_url_tracks_the_minor_release() {
		assert_eq!(
			Kubes::repo_url("v1.30"),
			"https://pkgs.k8s.io/core:/stable:/v1.30/deb",
		);
	}
}
