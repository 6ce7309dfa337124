//! Fatal exits, `PATH` lookup, and synchronous subprocess execution.
//!
//! Build scripts are expected to stop at the first problem.  [`fail`] prints
//! a message and terminates the process; [`which`] resolves a program on
//! `PATH` into an [`Executable`] that runs synchronously and reports
//! non-zero exits as errors.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::colorize::theme;
use crate::error::{CairnError, Result};

/// Write `why` to stderr with a bold red `[X] ` prefix and exit with code 1.
pub fn fail(why: &str) -> ! {
    fail_with(why, 1, false)
}

/// Write `why` to stderr and exit with `exit_code`.
///
/// The bold red `[X] ` prefix is included unless `no_prefix` is set.
pub fn fail_with(why: &str, exit_code: i32, no_prefix: bool) -> ! {
    let prefix = if no_prefix {
        String::new()
    } else {
        theme().error.apply_to("[X] ").to_string()
    };
    eprintln!("{prefix}{why}");
    std::process::exit(exit_code);
}

/// A resolved program that can be invoked synchronously.
///
/// Construct directly from a known path with [`Executable::new`], or look one
/// up on `PATH` with [`which`].  Invocations block until the child exits and
/// treat a non-zero exit as an error: either propagated ([`Executable::run`])
/// or fatal ([`Executable::run_or_fail`]).
#[derive(Debug, Clone)]
pub struct Executable {
    path: PathBuf,
    log_calls: bool,
}

impl Executable {
    /// Wrap an existing file as an executable.
    ///
    /// Fails with an `Execution` error when `path` is not a file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(CairnError::execution(format!(
                "The path '{}' is not a file.",
                path.display()
            )));
        }
        Ok(Self {
            path,
            log_calls: true,
        })
    }

    /// Disable echoing of the command line before each invocation.
    pub fn quiet(mut self) -> Self {
        self.log_calls = false;
        self
    }

    /// The resolved program path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the program with `args`, inheriting stdio.
    ///
    /// Returns [`CairnError::CommandFailed`] on a non-zero exit.
    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        self.echo(&args);
        let status = Command::new(&self.path).args(&args).status()?;
        if !status.success() {
            return Err(CairnError::CommandFailed {
                command: self.command_line(&args),
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Run the program and capture stdout (stderr is inherited).
    ///
    /// Returns [`CairnError::CommandFailed`] on a non-zero exit.
    pub fn output<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        self.echo(&args);
        let output = Command::new(&self.path).args(&args).output()?;
        if !output.status.success() {
            return Err(CairnError::CommandFailed {
                command: self.command_line(&args),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run the program with `args`; on any failure, [`fail`] the process.
    pub fn run_or_fail<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        if let Err(err) = self.run(args) {
            fail(&err.to_string());
        }
    }

    fn command_line(&self, args: &[OsString]) -> String {
        let mut line = self.path.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn echo(&self, args: &[OsString]) {
        let line = self.command_line(args);
        tracing::debug!(command = %line, "spawning");
        if self.log_calls {
            println!("{}", theme().command.apply_to(format!("$ {line}")));
        }
    }
}

/// Locate `name` on `PATH` and wrap it as an [`Executable`].
///
/// On Windows the extensions listed in `PATHEXT` are also tried; on unix
/// candidates must carry an executable bit.
pub fn which(name: impl AsRef<str>) -> Result<Executable> {
    let name = name.as_ref();
    let paths = std::env::var_os("PATH").unwrap_or_default();
    for dir in std::env::split_paths(&paths) {
        for candidate in candidates(&dir, name) {
            if candidate.is_file() && is_executable(&candidate) {
                return Executable::new(candidate);
            }
        }
    }
    Err(CairnError::ExecutableNotFound {
        name: name.to_string(),
    })
}

/// [`which`], but [`fail`] the process when `name` cannot be found.
pub fn which_or_fail(name: impl AsRef<str>) -> Executable {
    which(name.as_ref()).unwrap_or_else(|err| fail(&err.to_string()))
}

fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut out = vec![dir.join(name)];
    if cfg!(windows) {
        let pathext =
            std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
        out.extend(
            pathext
                .split(';')
                .filter(|ext| !ext.is_empty())
                .map(|ext| dir.join(format!("{name}{ext}"))),
        );
    }
    out
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executable_requires_a_file() {
        let err = Executable::new("/this/file/is/not/here").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The path '/this/file/is/not/here' is not a file."
        );
    }

    #[cfg(unix)]
    #[test]
    fn which_finds_sh() {
        let sh = which("sh").expect("sh should exist on unix");
        assert!(sh.path().is_file());
    }

    #[test]
    fn which_reports_missing() {
        let err = which("cairn-no-such-program-exists").unwrap_err();
        assert!(matches!(err, CairnError::ExecutableNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn output_captures_stdout() {
        let sh = which("sh").unwrap().quiet();
        let out = sh.output(["-c", "echo hello"]).unwrap();
        assert_eq!(out, "hello\n");
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_nonzero_exit() {
        let sh = which("sh").unwrap().quiet();
        let err = sh.run(["-c", "exit 3"]).unwrap_err();
        match err {
            CairnError::CommandFailed { code, .. } => assert_eq!(code, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
