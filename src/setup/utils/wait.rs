use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::error::SetupError;

/// Poll `ready` every `interval` until it reports true or `timeout` elapses.
/// Returns whether the condition was met. Never blocks past
/// `timeout + interval`.
pub fn poll_until<F>(
	timeout: Duration,
	interval: Duration,
	mut ready: F,
) -> Result<bool, SetupError>
where
	F: FnMut() -> Result<bool, SetupError>,
{
	let deadline = Instant::now() + timeout;
	loop {
		if ready()? {
			return Ok(true);
		}
		if Instant::now() >= deadline {
			return Ok(false);
		}
		sleep(interval);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn an_immediately_ready_condition_polls_once() {
		let mut calls = 0;
		let met = poll_until(Duration::from_millis(50), Duration::from_millis(1), || {
			calls += 1;
			Ok(true)
		})
		.expect("poll failed");
		assert!(met);
		assert_eq!(calls, 1);
	}

	#[test]
	fn a_condition_met_after_a_few_polls_is_reported_met() {
		let mut calls = 0;
		let met = poll_until(Duration::from_millis(200), Duration::from_millis(1), || {
			calls += 1;
			Ok(calls >= 3)
		})
		.expect("poll failed");
		assert!(met);
		assert_eq!(calls, 3);
	}

	#[test]
	fn a_never_ready_condition_times_out_within_the_bound() {
		let timeout = Duration::from_millis(30);
		let interval = Duration::from_millis(5);
		let start = Instant::now();
		let met = poll_until(timeout, interval, || Ok(false)).expect("poll failed");
		assert!(!met);
		let elapsed = start.elapsed();
		assert!(elapsed >= timeout);
		assert!(elapsed < timeout + interval + Duration::from_millis(50));
	}

	#[test]
	fn a_condition_error_propagates_immediately() {
		let mut calls = 0;
		let err = poll_until(Duration::from_millis(50), Duration::from_millis(1), || {
			calls += 1;
			Err(SetupError::NetworkDetection("boom".to_owned()))
		})
		.expect_err("poll should have failed");
		assert!(matches!(err, SetupError::NetworkDetection(_)));
		assert_eq!(calls, 1);
	}
}
