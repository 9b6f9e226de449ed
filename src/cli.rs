use clap::{ArgAction, Parser};

use crate::config::NodeRole;

/// Command-line surface. Role flags mirror the provisioning modes; anything
/// unrecognized is ignored rather than rejected, and the last role flag wins
/// when both are given.
#[derive(Debug, Parser)]
#[command(
	name = "kubeup",
	version,
	about = "Bootstrap a single Kubernetes node (control-plane, worker, or combined).",
	disable_help_flag = true,
	ignore_errors = true
)]
pub struct Cli {
	/// Provision this machine as a control-plane node.
	#[arg(short = 'c', overrides_with = "single_node")]
	control_plane: bool,

	/// Provision this machine as a combined control-plane and worker node.
	#[arg(short = 's', overrides_with = "control_plane")]
	single_node: bool,

	/// Dump the captured run log when the run succeeds.
	#[arg(short = 'v')]
	pub verbose: bool,

	/// Print help.
	#[allow(dead_code)]
	#[arg(short = 'h', short_alias = '?', long = "help", action = ArgAction::Help)]
	help: Option<bool>,
}

impl Cli {
	pub fn role(&self) -> NodeRole {
		if self.single_node {
			NodeRole::SingleNode
		} else if self.control_plane {
			NodeRole::ControlPlane
		} else {
			NodeRole::Worker
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Cli {
		Cli::try_parse_from(std::iter::once("kubeup").chain(args.iter().copied()))
			.expect("flag parsing failed")
	}

	#[test]
	fn no_flags_selects_worker_role() {
		assert_eq!(parse(&[]).role(), NodeRole::Worker);
	}

	#[test]
	fn c_flag_selects_control_plane_role() {
		assert_eq!(parse(&["-c"]).role(), NodeRole::ControlPlane);
	}

	#[test]
	fn s_flag_selects_single_node_role() {
		assert_eq!(parse(&["-s"]).role(), NodeRole::SingleNode);
	}

	#[test]
	fn last_role_flag_wins() {
		assert_eq!(parse(&["-c", "-s"]).role(), NodeRole::SingleNode);
		assert_eq!(parse(&["-s", "-c"]).role(), NodeRole::ControlPlane);
	}

	#[test]
	fn unrecognized_flags_are_ignored() {
		assert_eq!(parse(&["-x"]).role(), NodeRole::Worker);
		assert_eq!(parse(&["--bogus", "-c"]).role(), NodeRole::ControlPlane);
	}

	#[test]
	fn verbose_flag_is_recognized() {
		assert!(parse(&["-v"]).verbose);
		assert!(!parse(&[]).verbose);
	}

	#[test]
	fn role_and_verbose_flags_combine() {
		let cli = parse(&["-s", "-v"]);
		assert_eq!(cli.role(), NodeRole::SingleNode);
		assert!(cli.verbose);
	}
}
