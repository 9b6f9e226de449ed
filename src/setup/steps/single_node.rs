use std::thread::sleep;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::SetupError;
use crate::setup::utils::{kctl, wait};
use crate::setup::{Ctx, SetupStep};

pub struct SingleNode;

impl SingleNode {
	pub const TAINT: &'static str = "node-role.kubernetes.io/control-plane:NoSchedule-";
	pub const TAINT_GRACE: Duration = Duration::from_secs(10);
	pub const SMOKE_POD: &'static str = "kubeup-smoke-test";
	pub const SMOKE_IMAGE: &'static str = "nginx:stable";
	pub const SMOKE_TIMEOUT: Duration = Duration::from_secs(180);
	pub const SMOKE_POLL: Duration = Duration::from_secs(5);
	pub const CONVERGE_TIMEOUT: Duration = Duration::from_secs(300);
	pub const CONVERGE_POLL: Duration = Duration::from_secs(10);
}

impl SetupStep for SingleNode {
	fn name(&self) -> &'static str {
		"SingleNode"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		Ok(false)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		untaint(ctx)?;
		smoke_test(ctx)?;
		wait_all_pods_running(ctx)?;
		Ok(())
	}
}

/// Allow workloads on the sole node by removing the control-plane taint.
fn untaint(ctx: &Ctx) -> Result<(), SetupError> {
	info!("Removing the control-plane scheduling taint.");
	// kubectl exits non-zero when the taint is already absent.
	if kctl::try_run(ctx, &["taint", "nodes", "--all", SingleNode::TAINT])?.is_none() {
		info!("Taint was already absent.");
	}
	sleep(SingleNode::TAINT_GRACE);
	Ok(())
}

/// Prove the node schedules workloads by running one throwaway pod.
fn smoke_test(ctx: &Ctx) -> Result<(), SetupError> {
	info!("Running the scheduling smoke test.");
	kctl::run(
		ctx,
		&[
			"run",
			SingleNode::SMOKE_POD,
			"--image",
			SingleNode::SMOKE_IMAGE,
			"--restart",
			"Never",
		],
	)?;
	let ready = wait::poll_until(
		SingleNode::SMOKE_TIMEOUT,
		SingleNode::SMOKE_POLL,
		|| match kctl::try_run(ctx, &["get", "pod", SingleNode::SMOKE_POD, "--no-headers"])? {
			Some(listing) => Ok(kctl::pod_is_ready(&listing)),
			None => Ok(false),
		},
	)?;
	let _ = kctl::try_run(
		ctx,
		&["delete", "pod", SingleNode::SMOKE_POD, "--ignore-not-found"],
	);
	if !ready {
		return Err(SetupError::SmokeTestTimeout {
			timeout: SingleNode::SMOKE_TIMEOUT,
		});
	}
	info!("Smoke-test pod became Ready.");
	Ok(())
}

/// Final convergence gate. Soft: on timeout the offending pods are reported
/// and the run continues.
fn wait_all_pods_running(ctx: &Ctx) -> Result<(), SetupError> {
	info!(
		"Waiting up to {}s for all pods to be Running.",
		SingleNode::CONVERGE_TIMEOUT.as_secs()
	);
	let mut last_pending = Vec::new();
	let converged = wait::poll_until(
		SingleNode::CONVERGE_TIMEOUT,
		SingleNode::CONVERGE_POLL,
		|| match kctl::try_run(ctx, &["get", "pods", "--all-namespaces", "--no-headers"])? {
			Some(listing) => {
				last_pending = kctl::pending_pods(&listing);
				Ok(last_pending.is_empty())
			}
			None => Ok(false),
		},
	)?;
	if converged {
		info!("All pods are Running.");
	} else {
		warn!(
			"Pods still not Running after {}s: {}.",
			SingleNode::CONVERGE_TIMEOUT.as_secs(),
			last_pending.join(", "),
		);
	}
	Ok(())
}
