use std::fs;

use tracing::info;

use crate::error::SetupError;
use crate::setup::utils::cmd;
use crate::setup::{Ctx, SetupStep};

pub struct DisableSwap;

impl DisableSwap {
	pub const FSTAB_PATH: &'static str = "/etc/fstab";
	pub const SWAPS_PATH: &'static str = "/proc/swaps";
}

impl SetupStep for DisableSwap {
	fn name(&self) -> &'static str {
		"DisableSwap"
	}

	fn check(&self, _ctx: &Ctx) -> Result<bool, SetupError> {
		let is_swap_on = fs::read_to_string(Self::SWAPS_PATH)?.lines().count() > 1;
		if is_swap_on {
			info!("Swap is enabled.");
			return Ok(false);
		}
		let Ok(fstab) = fs::read_to_string(Self::FSTAB_PATH) else {
			info!("fstab is missing or unreadable.");
			return Ok(false);
		};
		if has_swap_entries(&fstab) {
			info!("Swap is enabled in fstab.");
			return Ok(false);
		}
		Ok(true)
	}

	fn set(&self, ctx: &Ctx) -> Result<(), SetupError> {
		cmd::run(ctx, "swapoff", &["-a"])?;
		let fstab = fs::read_to_string(Self::FSTAB_PATH)?;
		let updated = comment_swap_entries(&fstab);
		if updated != fstab {
			info!("Commenting out swap entries in {}.", Self::FSTAB_PATH);
			fs::write(Self::FSTAB_PATH, updated)?;
		}
		Ok(())
	}
}

/// An uncommented fstab line whose third field is `swap`.
fn is_swap_line(line: &str) -> bool {
	if line.trim_start().starts_with('#') {
		return false;
	}
	line.split_whitespace().nth(2) == Some("swap")
}

fn has_swap_entries(fstab: &str) -> bool {
	fstab.lines().any(is_swap_line)
}

/// Comment out swap entries so swap stays off across reboots. The kubelet
/// refuses to run with swap enabled.
fn comment_swap_entries(fstab: &str) -> String {
	let commented = fstab
		.lines()
		.map(|line| {
			if is_swap_line(line) {
				format!("#{line}")
			} else {
				line.to_owned()
			}
		})
		.collect::<Vec<_>>()
		.join("\n");
	if fstab.ends_with('\n') {
		commented + "\n"
	} else {
		commented
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const FSTAB: &str = "\
# /etc/fstab: static file system information.
UUID=aaaa-bbbb / ext4 defaults 0 1
/swap.img\tnone\tswap\tsw\t0\t0
UUID=cccc-dddd /boot ext4 defaults 0 2
";

	#[test]
	fn swap_lines_are_detected() {
		assert!(has_swap_entries(FSTAB));
		assert!(!has_swap_entries("UUID=aaaa-bbbb / ext4 defaults 0 1\n"));
	}

	#[test]
	fn commented_swap_lines_are_not_counted() {
		assert!(!has_swap_entries("#/swap.img none swap sw 0 0\n"));
	}

	#[test]
	fn only_swap_entries_are_commented_out() {
		let updated = comment_swap_entries(FSTAB);
		assert!(updated.contains("#/swap.img\tnone\tswap\tsw\t0\t0"));
		assert!(updated.contains("\nUUID=aaaa-bbbb / ext4 defaults 0 1\n"));
		assert!(updated.contains("\nUUID=cccc-dddd /boot ext4 defaults 0 2\n"));
		assert!(!has_swap_entries(&updated));
	}

	#[test]
	fn commenting_is_idempotent() {
		let once = comment_swap_entries(FSTAB);
		let twice = comment_swap_entries(&once);
		assert_eq!(once, twice);
	}

	#[test]
	fn the_trailing_newline_is_preserved() {
		assert!(comment_swap_entries(FSTAB).ends_with("0 2\n"));
		let no_newline = "/swap.img none swap sw 0 0";
		assert_eq!(comment_swap_entries(no_newline), "#/swap.img none swap sw 0 0");
	}
}
