use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;

/// Scoped per-run log resource: a uniquely named temporary directory holding
/// `setup.log`. Step output is appended here instead of streamed to the
/// console, so a failure can be reported with full context. The directory is
/// removed when the value drops, on success and failure paths alike.
#[derive(Debug)]
pub struct RunLog {
	dir: TempDir,
	path: PathBuf,
}

impl RunLog {
	pub fn create() -> io::Result<Self> {
		let dir = tempfile::Builder::new().prefix("kubeup-").tempdir()?;
		let path = dir.path().join("setup.log");
		File::create(&path)?;
		Ok(RunLog { dir, path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn file(&self) -> io::Result<File> {
		OpenOptions::new().append(true).open(&self.path)
	}

	/// Record a section marker, one per provisioning step.
	pub fn begin_step(&self, name: &str) -> io::Result<()> {
		let mut file = self.file()?;
		writeln!(file, "==> {name}")
	}

	/// Append one executed command with both captured output streams.
	pub fn append_command(&self, cmd: &str, output: &Output) -> io::Result<()> {
		let mut file = self.file()?;
		writeln!(file, "$ {cmd}")?;
		file.write_all(&output.stdout)?;
		if !output.stdout.is_empty() && !output.stdout.ends_with(b"\n") {
			writeln!(file)?;
		}
		file.write_all(&output.stderr)?;
		if !output.stderr.is_empty() && !output.stderr.ends_with(b"\n") {
			writeln!(file)?;
		}
		writeln!(file, "[{}]", output.status)
	}

	/// Append a free-form note.
	pub fn note(&self, line: &str) -> io::Result<()> {
		let mut file = self.file()?;
		writeln!(file, "{line}")
	}

	/// Write the full buffered contents to `out`.
	pub fn dump(&self, out: &mut dyn Write) -> io::Result<()> {
		let mut contents = Vec::new();
		File::open(&self.path)?.read_to_end(&mut contents)?;
		out.write_all(&contents)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::process::Command;

	#[test]
	fn create_allocates_a_log_file_inside_the_run_directory() {
		let log = RunLog::create().expect("run log creation failed");
		assert!(log.path().is_file());
		assert!(log.path().parent().is_some_and(|dir| dir.is_dir()));
	}

	#[test]
	fn appended_entries_come_back_in_a_dump() {
		let log = RunLog::create().expect("run log creation failed");
		log.begin_step("Example").expect("step marker failed");
		let output = Command::new("sh")
			.args(["-c", "echo out; echo err >&2"])
			.output()
			.expect("sample command failed");
		log.append_command("sh -c ...", &output)
			.expect("append failed");
		log.note("done").expect("note failed");
		let mut dumped = Vec::new();
		log.dump(&mut dumped).expect("dump failed");
		let dumped = String::from_utf8(dumped).expect("log was not utf-8");
		assert!(dumped.contains("==> Example"));
		assert!(dumped.contains("$ sh -c ..."));
		assert!(dumped.contains("out"));
		assert!(dumped.contains("err"));
		assert!(dumped.contains("done"));
	}

	#[test]
	fn dropping_the_log_removes_the_run_directory() {
		let log = RunLog::create().expect("run log creation failed");
		let path = log.path().to_path_buf();
		let dir = path.parent().expect("log file has no parent").to_path_buf();
		assert!(dir.is_dir());
		drop(log);
		assert!(!dir.exists());
		assert!(!path.exists());
	}
}
