mod steps;
mod utils;

use tracing::info;

use crate::config::{NodeRole, RunConfig};
use crate::error::SetupError;
use crate::runlog::RunLog;
use crate::setup::steps::{
	Containerd, ControlPlane, DisableSwap, KernelModules, Kubes, Preflight, RemovePackages,
	Services, SingleNode, Sysctl, WorkerCheck,
};

/// Per-run context handed to every step: the immutable configuration and the
/// scoped run log that captures all external command output.
pub struct Ctx<'a> {
	pub config: &'a RunConfig,
	pub log: &'a RunLog,
}

pub trait SetupStep {
	fn name(&self) -> &'static str;
	/// Report whether the step is already satisfied on this host.
	fn check(&self, ctx: &Ctx) -> Result<bool, SetupError>;
	/// Bring the host into the state this step is responsible for.
	fn set(&self, ctx: &Ctx) -> Result<(), SetupError>;
}

fn steps_for(role: NodeRole) -> Vec<Box<dyn SetupStep>> {
	let mut steps: Vec<Box<dyn SetupStep>> = vec![
		Box::new(Preflight),
		Box::new(DisableSwap),
		Box::new(RemovePackages),
		Box::new(KernelModules),
		Box::new(Sysctl),
		Box::new(Containerd),
		Box::new(Kubes),
		Box::new(Services),
	];
	match role {
		NodeRole::Worker => steps.push(Box::new(WorkerCheck)),
		NodeRole::ControlPlane => steps.push(Box::new(ControlPlane)),
		NodeRole::SingleNode => {
			steps.push(Box::new(ControlPlane));
			steps.push(Box::new(SingleNode));
		}
	}
	steps
}

pub fn run(ctx: &Ctx) -> Result<(), SetupError> {
	for step in steps_for(ctx.config.role) {
		ctx.log.begin_step(step.name())?;
		if step.check(ctx)? {
			info!("{} is already satisfied.", step.name());
			continue;
		}
		step.set(ctx)?;
	}
	if ctx.config.role.is_cluster_init() {
		steps::control_plane::print_join_command(ctx)?;
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn names(role: NodeRole) -> Vec<&'static str> {
		steps_for(role).iter().map(|step| step.name()).collect()
	}

	#[test]
	fn every_role_shares_the_host_preparation_prefix() {
		for role in [
			NodeRole::Worker,
			NodeRole::ControlPlane,
			NodeRole::SingleNode,
		] {
			assert_eq!(
				&names(role)[..8],
				&[
					"Preflight",
					"DisableSwap",
					"RemovePackages",
					"KernelModules",
					"Sysctl",
					"Containerd",
					"Kubes",
					"Services",
				],
			);
		}
	}

	#[test]
	fn worker_sequence_ends_with_the_service_check() {
		let names = names(NodeRole::Worker);
		assert_eq!(names.last(), Some(&"WorkerCheck"));
		assert!(!names.contains(&"ControlPlane"));
		assert!(!names.contains(&"SingleNode"));
	}

	#[test]
	fn single_node_sequence_is_a_superset_of_the_control_plane_sequence() {
		let control_plane = names(NodeRole::ControlPlane);
		let single_node = names(NodeRole::SingleNode);
		assert!(control_plane
			.iter()
			.all(|name| single_node.contains(name)));
		assert_eq!(single_node.len(), control_plane.len() + 1);
		assert_eq!(single_node.last(), Some(&"SingleNode"));
	}
}
