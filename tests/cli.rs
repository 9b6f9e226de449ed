use assert_cmd::Command;
use predicates::prelude::*;

fn kubeup() -> Command {
	Command::cargo_bin("kubeup").expect("kubeup binary not built")
}

#[test]
fn long_help_prints_usage_and_exits_zero() {
	kubeup()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("control-plane"))
		.stdout(predicate::str::contains("-s"));
}

#[test]
fn short_help_exits_zero() {
	kubeup().arg("-h").assert().success();
}

#[test]
fn question_mark_help_exits_zero() {
	kubeup().arg("-?").assert().success();
}
