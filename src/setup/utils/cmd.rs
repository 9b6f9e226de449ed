use std::process::{Command, Output, Stdio};

use crate::error::SetupError;
use crate::setup::Ctx;

fn render(program: &str, args: &[&str]) -> String {
	if args.is_empty() {
		program.to_owned()
	} else {
		format!("{} {}", program, args.join(" "))
	}
}

fn capture(ctx: &Ctx, cmd: &str, mut command: Command) -> Result<Output, SetupError> {
	let output = command
		.output()
		.map_err(|source| SetupError::CommandLaunch {
			cmd: cmd.to_owned(),
			source,
		})?;
	ctx.log.append_command(cmd, &output)?;
	Ok(output)
}

fn command_failed(cmd: String, output: &Output) -> SetupError {
	let stderr = if output.stderr.is_empty() {
		None
	} else {
		Some(String::from_utf8_lossy(&output.stderr).trim().to_owned())
	};
	SetupError::CommandFailed {
		cmd,
		status: output.status,
		stderr,
	}
}

/// Run a command with both output streams captured into the run log. Fails on
/// a non-zero exit; returns the captured stdout otherwise.
pub fn run(ctx: &Ctx, program: &str, args: &[&str]) -> Result<String, SetupError> {
	let cmd = render(program, args);
	let mut command = Command::new(program);
	command.args(args);
	let output = capture(ctx, &cmd, command)?;
	if !output.status.success() {
		return Err(command_failed(cmd, &output));
	}
	Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Tolerant variant of `run`: a non-zero exit is still captured in the run
/// log but reported as `None` instead of an error.
pub fn try_run(ctx: &Ctx, program: &str, args: &[&str]) -> Result<Option<String>, SetupError> {
	let cmd = render(program, args);
	let mut command = Command::new(program);
	command.args(args);
	let output = capture(ctx, &cmd, command)?;
	if !output.status.success() {
		return Ok(None);
	}
	Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
}

/// Run a shell script through `sh -c`, captured like `run`.
pub fn shell(ctx: &Ctx, script: &str) -> Result<String, SetupError> {
	let mut command = Command::new("sh");
	command.args(["-c", script]);
	let output = capture(ctx, script, command)?;
	if !output.status.success() {
		return Err(command_failed(script.to_owned(), &output));
	}
	Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Read-only probe with discarded output, for `check` paths.
pub fn probe(program: &str, args: &[&str]) -> bool {
	Command::new(program)
		.args(args)
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.status()
		.is_ok_and(|status| status.success())
}
