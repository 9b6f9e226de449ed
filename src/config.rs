/// Which provisioning path this host takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
	Worker,
	ControlPlane,
	SingleNode,
}

impl NodeRole {
	/// Both cluster roles initialize a control plane; single-node additionally
	/// opens the sole node for workloads.
	pub fn is_cluster_init(self) -> bool {
		matches!(self, NodeRole::ControlPlane | NodeRole::SingleNode)
	}
}

/// Immutable run configuration: the selected role plus the pinned platform and
/// component versions. Built once at startup and passed to every step.
#[derive(Debug, Clone)]
pub struct RunConfig {
	pub role: NodeRole,
	pub verbose: bool,
	pub ubuntu_version: &'static str,
	pub ubuntu_codename: &'static str,
	pub kube_version: &'static str,
	pub kube_pkg_revision: &'static str,
	pub containerd_version: &'static str,
	pub calico_url: String,
	pub metrics_url: &'static str,
	pub pod_cidr: &'static str,
	pub api_port: u16,
}

impl RunConfig {
	pub const UBUNTU_VERSION: &'static str = "22.04";
	pub const UBUNTU_CODENAME: &'static str = "jammy";
	pub const KUBE_VERSION: &'static str = "1.30.4";
	pub const KUBE_PKG_REVISION: &'static str = "1.1";
	pub const CONTAINERD_VERSION: &'static str = "1.6.33-1";
	pub const CALICO_VERSION: &'static str = "v3.28.1";
	pub const METRICS_URL: &'static str =
		"https://github.com/kubernetes-sigs/metrics-server/releases/latest/download/components.yaml";
	pub const POD_CIDR: &'static str = "192.168.0.0/16";
	pub const API_PORT: u16 = 6443;

	pub fn new(role: NodeRole, verbose: bool) -> Self {
		RunConfig {
			role,
			verbose,
			ubuntu_version: Self::UBUNTU_VERSION,
			ubuntu_codename: Self::UBUNTU_CODENAME,
			kube_version: Self::KUBE_VERSION,
			kube_pkg_revision: Self::KUBE_PKG_REVISION,
			containerd_version: Self::CONTAINERD_VERSION,
			calico_url: format!(
				"https://raw.githubusercontent.com/projectcalico/calico/{}/manifests/calico.yaml",
				Self::CALICO_VERSION
			),
			metrics_url: Self::METRICS_URL,
			pod_cidr: Self::POD_CIDR,
			api_port: Self::API_PORT,
		}
	}

	/// Full apt pin for the Kubernetes packages, e.g. "1.30.4-1.1".
	pub fn kube_pkg_version(&self) -> String {
		format!("{}-{}", self.kube_version, self.kube_pkg_revision)
	}

	/// Minor-release channel for the pkgs.k8s.io repository, e.g. "v1.30".
	pub fn kube_minor(&self) -> String {
		let mut parts = self.kube_version.splitn(3, '.');
		let major = parts.next().unwrap_or("1");
		let minor = parts.next().unwrap_or("0");
		format!("v{major}.{minor}")
	}
}
