use serde::Deserialize;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::Ctx;

pub const KUBECONFIG: &str = "/etc/kubernetes/admin.conf";

/// Run kubectl against the admin kubeconfig, captured into the run log.
pub fn run(ctx: &Ctx, args: &[&str]) -> Result<String, SetupError> {
	let mut full = vec!["--kubeconfig", KUBECONFIG];
	full.extend_from_slice(args);
	cmd::run(ctx, "kubectl", &full)
}

/// Tolerant variant: a non-zero kubectl exit is reported as `None`.
pub fn try_run(ctx: &Ctx, args: &[&str]) -> Result<Option<String>, SetupError> {
	let mut full = vec!["--kubeconfig", KUBECONFIG];
	full.extend_from_slice(args);
	cmd::try_run(ctx, "kubectl", &full)
}

/// Apply a manifest fetched by URL.
pub fn apply_url(ctx: &Ctx, url: &str) -> Result<(), SetupError> {
	run(ctx, &["apply", "-f", url])?;
	Ok(())
}

/// True when `kubectl get nodes --no-headers` lists at least one node and
/// every one of them reports Ready.
pub fn all_nodes_ready(listing: &str) -> bool {
	let mut nodes = 0;
	for line in listing.lines() {
		let mut fields = line.split_whitespace();
		if fields.next().is_none() {
			continue;
		}
		let Some(status) = fields.next() else {
			return false;
		};
		nodes += 1;
		if !status.split(',').any(|state| state == "Ready") {
			return false;
		}
	}
	nodes > 0
}

/// True when a single-pod `get pod --no-headers` line reports every container
/// ready and the pod Running.
pub fn pod_is_ready(line: &str) -> bool {
	let fields: Vec<&str> = line.split_whitespace().collect();
	if fields.len() < 3 {
		return false;
	}
	let all_ready = fields[1]
		.split_once('/')
		.is_some_and(|(ready, total)| !total.is_empty() && ready == total);
	all_ready && fields[2] == "Running"
}

/// Pods not yet settled, as "namespace/name (status)" entries, from
/// `kubectl get pods --all-namespaces --no-headers` output. Completed pods
/// count as settled.
pub fn pending_pods(listing: &str) -> Vec<String> {
	let mut pending = Vec::new();
	for line in listing.lines() {
		let fields: Vec<&str> = line.split_whitespace().collect();
		if fields.len() < 4 {
			continue;
		}
		let (namespace, name, status) = (fields[0], fields[1], fields[3]);
		if status != "Running" && status != "Completed" {
			pending.push(format!("{namespace}/{name} ({status})"));
		}
	}
	pending
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
	#[serde(rename = "gitVersion")]
	git_version: String,
}

#[derive(Debug, Deserialize)]
struct VersionReport {
	#[serde(rename = "clientVersion")]
	client: VersionInfo,
	#[serde(rename = "serverVersion")]
	server: VersionInfo,
}

/// Parse `kubectl version -o json` output and require that the client, the
/// server, and the requested pin all agree.
pub fn validate_versions(report_json: &str, requested: &str) -> Result<(), SetupError> {
	let report: VersionReport = serde_json::from_str(report_json)?;
	let client = report.client.git_version;
	let server = report.server.git_version;
	let requested = format!("v{requested}");
	if client != server || server != requested {
		return Err(SetupError::VersionMismatch {
			client,
			server,
			requested,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn all_nodes_ready_requires_every_node_ready() {
		let ready = "node-a   Ready   control-plane   2m    v1.30.4\n";
		let mixed = "node-a   Ready      control-plane   2m   v1.30.4\n\
		             node-b   NotReady   <none>          1m   v1.30.4\n";
		assert!(all_nodes_ready(ready));
		assert!(!all_nodes_ready(mixed));
	}

	#[test]
	fn all_nodes_ready_accepts_compound_statuses() {
		let listing = "node-a   Ready,SchedulingDisabled   control-plane   2m   v1.30.4\n";
		assert!(all_nodes_ready(listing));
	}

	#[test]
	fn all_nodes_ready_rejects_an_empty_listing() {
		assert!(!all_nodes_ready(""));
	}

	#[test]
	fn pod_is_ready_requires_full_readiness_and_running() {
		assert!(pod_is_ready("smoke   1/1   Running     0   30s"));
		assert!(!pod_is_ready("smoke   0/1   Running     0   30s"));
		assert!(!pod_is_ready("smoke   1/1   Completed   0   30s"));
		assert!(!pod_is_ready("smoke   1/1   Pending     0   30s"));
		assert!(!pod_is_ready(""));
	}

	#[test]
	fn pending_pods_lists_only_unsettled_pods() {
		let listing = "\
kube-system   coredns-abc          1/1   Running             0   2m
kube-system   calico-node-xyz      0/1   Init:0/3            0   1m
kube-system   job-seed-pqr         0/1   Completed           0   2m
default       broken-pod           0/1   CrashLoopBackOff    4   2m
";
		let pending = pending_pods(listing);
		assert_eq!(
			pending,
			vec![
				"kube-system/calico-node-xyz (Init:0/3)",
				"default/broken-pod (CrashLoopBackOff)",
			],
		);
	}

	fn report(client: &str, server: &str) -> String {
		format!(
			r#"{{"clientVersion": {{"gitVersion": "{client}", "major": "1", "minor": "30"}},
			    "serverVersion": {{"gitVersion": "{server}", "major": "1", "minor": "30"}}}}"#,
		)
	}

	#[test]
	fn validate_versions_accepts_a_full_match() {
		assert!(validate_versions(&report("v1.30.4", "v1.30.4"), "1.30.4").is_ok());
	}

	#[test]
	fn validate_versions_rejects_a_client_server_skew() {
		let err = validate_versions(&report("v1.30.5", "v1.30.4"), "1.30.4")
			.expect_err("skew should fail");
		assert!(matches!(err, SetupError::VersionMismatch { .. }));
	}

	#[test]
	fn validate_versions_rejects_an_unrequested_server_version() {
		let err = validate_versions(&report("v1.30.5", "v1.30.5"), "1.30.4")
			.expect_err("wrong server version should fail");
		assert!(matches!(err, SetupError::VersionMismatch { .. }));
	}

	#[test]
	fn validate_versions_rejects_a_malformed_report() {
		let err = validate_versions("{\"clientVersion\": {}}", "1.30.4")
			.expect_err("malformed report should fail");
		assert!(matches!(err, SetupError::VersionReport(_)));
	}
}
