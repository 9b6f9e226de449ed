use std::env;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::SetupError;
use crate::setup::utils::{cmd, kctl, net, wait};
use crate::setup::{Ctx, SetupStep};

pub struct ControlPlane;

impl ControlPlane {
	pub const KUBEADM_CONFIG_PATH: &'static str = "kubeadm-config.yaml";
	pub const READY_TIMEOUT: Duration = Duration::from_secs(180);
	pub const READY_POLL: Duration = Duration::from_secs(5);
	pub const METRICS_TIMEOUT: Duration = Duration::from_secs(180);
}

impl SetupStep for ControlPlane {
	fn name(&self) -> &'static str {
		"ControlPlane"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		// An initialized control plane leaves its admin kubeconfig behind.
		if Path::new(kctl::KUBECONFIG).exists() {
			info!("Control plane is already initialized.");
			return Ok(true);
		}
		Ok(false)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		let endpoint_ip = net::primary_ipv4(ctx)?;
		init_cluster(ctx, endpoint_ip)?;
		configure_access(ctx);
		install_cni(ctx)?;
		wait_nodes_ready(ctx)?;
		validate_version(ctx)?;
		install_metrics(ctx)?;
		Ok(())
	}
}

fn init_cluster(ctx: &Ctx, endpoint_ip: Ipv4Addr) -> Result<(), SetupError> {
	info!("Initializing the control plane at {endpoint_ip}.");
	let config = render_kubeadm_config(
		ctx.config.kube_version,
		ctx.config.pod_cidr,
		endpoint_ip,
		ctx.config.api_port,
	);
	fs::write(ControlPlane::KUBEADM_CONFIG_PATH, config)?;
	cmd::run(
		ctx,
		"kubeadm",
		&["init", "--config", ControlPlane::KUBEADM_CONFIG_PATH],
	)?;
	info!("kubeadm init finished.");
	Ok(())
}

/// Minimal ClusterConfiguration for a pinned single-control-plane bootstrap.
fn render_kubeadm_config(
	kube_version: &str,
	pod_cidr: &str,
	endpoint_ip: Ipv4Addr,
	api_port: u16,
) -> String {
	format!(
		concat!(
			"apiVersion: kubeadm.k8s.io/v1beta3\n",
			"kind: ClusterConfiguration\n",
			"kubernetesVersion: v{version}\n",
			"controlPlaneEndpoint: \"{ip}:{port}\"\n",
			"networking:\n",
			"  podSubnet: \"{cidr}\"\n",
		),
		version = kube_version,
		ip = endpoint_ip,
		port = api_port,
		cidr = pod_cidr,
	)
}

/// Copy the admin kubeconfig into the invoking user's home. Best-effort: a
/// missing user or home directory is logged, not fatal.
fn configure_access(ctx: &Ctx) {
	let user = match env::var("SUDO_USER").or_else(|_| env::var("USER")) {
		Ok(user) if !user.is_empty() => user,
		_ => {
			warn!("No invoking user found, leaving admin credentials in place.");
			return;
		}
	};
	let script = format!(
		"home=$(getent passwd {user} | cut -d: -f6) && [ -n \"$home\" ] && \
		 mkdir -p \"$home/.kube\" && \
		 cp -f /etc/kubernetes/admin.conf \"$home/.kube/config\" && \
		 chown {user}:{user} \"$home/.kube/config\"",
	);
	match cmd::shell(ctx, &script) {
		Ok(_) => info!("Admin kubeconfig installed for {user}."),
		Err(err) => warn!("Failed to install the admin kubeconfig for {user}: {err}"),
	}
}

fn install_cni(ctx: &Ctx) -> Result<(), SetupError> {
	info!("Applying the Calico manifest.");
	kctl::apply_url(ctx, &ctx.config.calico_url)
}

fn wait_nodes_ready(ctx: &Ctx) -> Result<(), SetupError> {
	info!(
		"Waiting up to {}s for all nodes to be Ready.",
		ControlPlane::READY_TIMEOUT.as_secs()
	);
	let ready = wait::poll_until(
		ControlPlane::READY_TIMEOUT,
		ControlPlane::READY_POLL,
		|| match kctl::try_run(ctx, &["get", "nodes", "--no-headers"])? {
			Some(listing) => Ok(kctl::all_nodes_ready(&listing)),
			None => Ok(false),
		},
	)?;
	if !ready {
		return Err(SetupError::ReadinessTimeout {
			timeout: ControlPlane::READY_TIMEOUT,
		});
	}
	info!("All nodes are Ready.");
	Ok(())
}

fn validate_version(ctx: &Ctx) -> Result<(), SetupError> {
	let report = kctl::run(ctx, &["version", "-o", "json"])?;
	kctl::validate_versions(&report, ctx.config.kube_version)?;
	info!(
		"Client and server versions match v{}.",
		ctx.config.kube_version
	);
	Ok(())
}

fn install_metrics(ctx: &Ctx) -> Result<(), SetupError> {
	info!("Applying the metrics-server manifest.");
	kctl::apply_url(ctx, ctx.config.metrics_url)?;
	// Rollout wait is best-effort: a slow metrics-server does not fail an
	// otherwise healthy bootstrap.
	let timeout = format!("{}s", ControlPlane::METRICS_TIMEOUT.as_secs());
	let rolled_out = kctl::try_run(
		ctx,
		&[
			"-n",
			"kube-system",
			"rollout",
			"status",
			"deployment/metrics-server",
			"--timeout",
			timeout.as_str(),
		],
	)?;
	if rolled_out.is_none() {
		warn!("metrics-server did not report a complete rollout in time, continuing.");
	}
	Ok(())
}

/// Emit the exact command a worker node runs to join this cluster. The token
/// is created with an unlimited TTL.
pub fn print_join_command(ctx: &Ctx) -> Result<(), SetupError> {
	let join = cmd::run(
		ctx,
		"kubeadm",
		&["token", "create", "--print-join-command", "--ttl", "0"],
	)?;
	info!("Cluster is ready to accept worker nodes.");
	println!("Run the following on each worker node to join the cluster:");
	println!("  sudo {}", join.trim());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn the_kubeadm_config_embeds_version_endpoint_and_subnet() {
		let config = render_kubeadm_config(
			"1.30.4",
			"192.168.0.0/16",
			Ipv4Addr::new(10, 0, 0, 7),
			6443,
		);
		assert!(config.starts_with("apiVersion: kubeadm.k8s.io/v1beta3\n"));
		assert!(config.contains("kind: ClusterConfiguration\n"));
		assert!(config.contains("kubernetesVersion: v1.30.4\n"));
		assert!(config.contains("controlPlaneEndpoint: \"10.0.0.7:6443\"\n"));
		assert!(config.contains("networking:\n  podSubnet: \"192.168.0.0/16\"\n"));
	}
}
