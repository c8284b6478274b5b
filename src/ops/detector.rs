//! External hydrogen-bond detection.
//!
//! The pipeline never computes hydrogen bonds itself. A [`BondDetector`] takes a structure file
//! in a worker's scratch directory and produces two sibling files: the hydrogen-augmented
//! structure (`.h`) and the bond report (`.hb2`). [`Hbplus`] runs the HBPLUS executable as a
//! child process with an explicit argument list.

use crate::ops::error::Error;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Extension of the hydrogen-augmented structure written by the detector.
pub const AUGMENTED_EXTENSION: &str = "h";
/// Extension of the bond report written by the detector.
pub const BOND_REPORT_EXTENSION: &str = "hb2";

/// Incidental files HBPLUS leaves in its working directory.
const DEBUG_FILES: &[&str] = &["hbdebug.dat"];

/// Number of trailing stderr lines kept in failure messages.
const STDERR_TAIL_LINES: usize = 5;

/// Paths of the files produced by one detector run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorOutput {
    pub augmented: PathBuf,
    pub bond_report: PathBuf,
}

impl DetectorOutput {
    /// Output paths a detector is expected to write for `structure`.
    pub fn expected_for(structure: &Path) -> Self {
        Self {
            augmented: structure.with_extension(AUGMENTED_EXTENSION),
            bond_report: structure.with_extension(BOND_REPORT_EXTENSION),
        }
    }
}

/// Produces an augmented structure and a bond report for a structure file.
///
/// Implementations are shared by every worker, so they must be thread-safe; each call only
/// touches files next to `structure`.
pub trait BondDetector: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Runs detection for the structure file and returns the paths of its outputs.
    ///
    /// # Errors
    ///
    /// [`Error::DetectorUnavailable`] when the detector cannot be started at all, and
    /// [`Error::DetectorFailure`] when a run fails or leaves an expected output missing.
    fn detect(&self, structure: &Path) -> Result<DetectorOutput, Error>;
}

/// HBPLUS invoked as `<program> <structure file> <args...>` inside the structure's directory.
#[derive(Debug, Clone)]
pub struct Hbplus {
    program: PathBuf,
    args: Vec<String>,
}

impl Hbplus {
    /// Creates a detector for the given executable.
    ///
    /// Programs given as a path (anything with a directory component) are canonicalized up
    /// front so they keep resolving after the child changes its working directory; bare names
    /// are looked up on `PATH` at spawn time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetectorUnavailable`] when a program path does not exist.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Result<Self, Error> {
        let program = program.into();
        let program = if program.components().count() > 1 {
            fs::canonicalize(&program).map_err(|source| Error::DetectorUnavailable {
                program: program.display().to_string(),
                source,
            })?
        } else {
            program
        };
        Ok(Self { program, args })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl BondDetector for Hbplus {
    fn name(&self) -> &str {
        "hbplus"
    }

    fn detect(&self, structure: &Path) -> Result<DetectorOutput, Error> {
        let workdir = structure
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let file_name = structure.file_name().ok_or_else(|| {
            Error::detector_failure(
                self.program_name(),
                None,
                format!("'{}' is not a file path", structure.display()),
            )
        })?;

        let expected = DetectorOutput::expected_for(structure);
        remove_if_present(&expected.augmented)?;
        remove_if_present(&expected.bond_report)?;

        debug!(
            "running {} {} {:?} in {}",
            self.program_name(),
            file_name.to_string_lossy(),
            self.args,
            workdir.display()
        );

        let output = Command::new(&self.program)
            .arg(file_name)
            .args(&self.args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::DetectorUnavailable {
                program: self.program_name(),
                source,
            })?;

        for debug_file in DEBUG_FILES {
            remove_if_present(&workdir.join(debug_file))?;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{} stdout: {}", self.name(), stdout.trim_end());
        }

        if !output.status.success() {
            return Err(Error::detector_failure(
                self.program_name(),
                output.status.code(),
                stderr_tail(&output.stderr),
            ));
        }

        for path in [&expected.augmented, &expected.bond_report] {
            if !path.is_file() {
                return Err(Error::detector_failure(
                    self.program_name(),
                    output.status.code(),
                    format!("expected output '{}' was not written", path.display()),
                ));
            }
        }

        Ok(expected)
    }
}

fn remove_if_present(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::scratch(path, e)),
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no diagnostic output".to_string();
    }
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn expected_outputs_sit_next_to_structure() {
        let expected = DetectorOutput::expected_for(Path::new("/tmp/w0/unit.pdb"));

        assert_eq!(expected.augmented, PathBuf::from("/tmp/w0/unit.h"));
        assert_eq!(expected.bond_report, PathBuf::from("/tmp/w0/unit.hb2"));
    }

    #[test]
    fn missing_program_path_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = Hbplus::new(dir.path().join("no-such-hbplus"), vec![]).unwrap_err();

        assert!(matches!(err, Error::DetectorUnavailable { .. }));
        assert!(err.is_setup_failure());
    }

    #[test]
    fn bare_program_name_is_kept_for_path_lookup() {
        let detector = Hbplus::new("hbplus", vec!["-o".to_string()]).unwrap();

        assert_eq!(detector.program(), Path::new("hbplus"));
        assert_eq!(detector.args(), ["-o".to_string()]);
    }

    #[test]
    fn unknown_bare_program_fails_to_spawn() {
        let dir = TempDir::new().unwrap();
        let structure = dir.path().join("unit.pdb");
        fs::write(&structure, "END\n").unwrap();

        let detector = Hbplus::new("hbdist-test-no-such-detector", vec![]).unwrap();
        let err = detector.detect(&structure).unwrap_err();

        assert!(matches!(err, Error::DetectorUnavailable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_detector_failure() {
        let dir = TempDir::new().unwrap();
        let structure = dir.path().join("unit.pdb");
        fs::write(&structure, "END\n").unwrap();

        let detector = Hbplus::new("false", vec![]).unwrap();
        let err = detector.detect(&structure).unwrap_err();

        match err {
            Error::DetectorFailure { status, .. } => assert_eq!(status, Some(1)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_run_without_outputs_is_a_detector_failure() {
        let dir = TempDir::new().unwrap();
        let structure = dir.path().join("unit.pdb");
        fs::write(&structure, "END\n").unwrap();
        fs::write(dir.path().join("unit.h"), "stale\n").unwrap();

        let detector = Hbplus::new("true", vec![]).unwrap();
        let err = detector.detect(&structure).unwrap_err();

        assert!(matches!(err, Error::DetectorFailure { .. }));
        assert!(err.to_string().contains("unit.h"));
        assert!(!dir.path().join("unit.h").exists());
    }

    /// Writes an executable stand-in for HBPLUS that records its arguments in `<stem>.h`, its
    /// working directory in `<stem>.hb2`, and leaves `hbdebug.dat` behind.
    #[cfg(unix)]
    fn fake_hbplus(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-hbplus");
        fs::write(
            &script,
            "#!/bin/sh\nstem=\"${1%.*}\"\nshift\necho \"$@\" > \"$stem.h\"\npwd > \"$stem.hb2\"\necho debug > hbdebug.dat\n",
        )
        .unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn successful_run_returns_outputs_and_removes_debug_file() {
        let tools = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let structure = scratch.path().join("unit_0.pdb");
        fs::write(&structure, "END\n").unwrap();

        let detector = Hbplus::new(fake_hbplus(tools.path()), vec!["-o".to_string()]).unwrap();
        let output = detector.detect(&structure).unwrap();

        assert_eq!(output, DetectorOutput::expected_for(&structure));
        assert_eq!(fs::read_to_string(&output.augmented).unwrap(), "-o\n");
        let workdir = fs::read_to_string(&output.bond_report).unwrap();
        assert_eq!(
            fs::canonicalize(workdir.trim()).unwrap(),
            fs::canonicalize(scratch.path()).unwrap()
        );
        assert!(!scratch.path().join("hbdebug.dat").exists());
    }

    #[test]
    fn stderr_tail_keeps_last_non_empty_lines() {
        let stderr = b"one\n\ntwo\nthree\nfour\nfive\nsix\n";
        assert_eq!(stderr_tail(stderr), "two | three | four | five | six");
        assert_eq!(stderr_tail(b""), "no diagnostic output");
    }
}
