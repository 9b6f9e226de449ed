use std::net::Ipv4Addr;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::Ctx;

/// Detect the primary outbound IPv4 address from the default route. Fails when
/// the route has no well-formed source address; nothing downstream should run
/// against a bogus endpoint.
pub fn primary_ipv4(ctx: &Ctx) -> Result<Ipv4Addr, SetupError> {
	let route = cmd::run(ctx, "ip", &["-4", "route", "get", "1.1.1.1"])?;
	route_source(&route).ok_or_else(|| {
		SetupError::NetworkDetection(format!(
			"no well-formed source address in route output '{}'",
			route.trim()
		))
	})
}

/// Extract the `src` field from `ip route get` output.
fn route_source(route: &str) -> Option<Ipv4Addr> {
	let mut words = route.split_whitespace();
	while let Some(word) = words.next() {
		if word == "src" {
			return words.next()?.parse().ok();
		}
	}
	None
}
