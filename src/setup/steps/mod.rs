pub mod containerd;
pub mod control_plane;
pub mod disable_swap;
pub mod kernel_modules;
pub mod kubes;
pub mod preflight;
pub mod remove_packages;
pub mod services;
pub mod single_node;
pub mod sysctl;
pub mod worker;

pub use containerd::Containerd;
pub use control_plane::ControlPlane;
pub use disable_swap::DisableSwap;
pub use kernel_modules::KernelModules;
pub use kubes::Kubes;
pub use preflight::Preflight;
pub use remove_packages::RemovePackages;
pub use services::Services;
pub use single_node::SingleNode;
pub use sysctl::Sysctl;
pub use worker::WorkerCheck;
