//! # Executor
//!
//! Final stage of the pipeline: finds the program to run in the code
//! directory and runs it, or runs the caller's arguments verbatim when
//! nothing matches.
//!
//! ## Process
//!
//! 1.  **Resolve**: The configured glob patterns are tried in order, relative
//!     to the code directory. The first pattern with any match wins, and its
//!     first match (lexical order) is the target. No match plus a non-empty
//!     argument list means pass-through mode.
//!
//! 2.  **Prepare**: A bundled target is made executable, directly or through
//!     `sudo chmod +x`, unless the configuration turns that off.
//!
//! 3.  **Launch**: The child runs with the code directory as its working
//!     directory and inherits stdin, stdout and stderr. Its exit status is
//!     the result of the stage.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

/// Mode applied by a direct chmod.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// What the executor decided to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A file in the code directory matched a pattern.
    Bundled {
        /// Path relative to the code directory, as matched.
        file: PathBuf,
        args: Vec<String>,
    },
    /// Nothing matched; the first argument is the program.
    PassThrough { program: String, args: Vec<String> },
}

impl Target {
    /// Program name as reported in logs and errors.
    pub fn program(&self) -> String {
        match self {
            Target::Bundled { file, .. } => format!("./{}", file.display()),
            Target::PassThrough { program, .. } => program.clone(),
        }
    }
}

/// Result of a successful launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A bundled file was found and run.
    Bundled { file: PathBuf, status: ExitStatus },
    /// The caller's arguments were run verbatim.
    PassThrough { program: String, status: ExitStatus },
}

impl Outcome {
    pub fn status(&self) -> ExitStatus {
        match self {
            Outcome::Bundled { status, .. } | Outcome::PassThrough { status, .. } => *status,
        }
    }
}

/// Finds and runs the program for one configuration
#[derive(Debug)]
pub struct Executor<'a> {
    config: &'a Config,
}

impl<'a> Executor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn code_dir(&self) -> &Path {
        &self.config.paths.code
    }

    /// Decide what to run for `args` without running anything.
    pub fn resolve(&self, args: &[String]) -> Result<Target> {
        let code_dir = self.code_dir();
        if !code_dir.is_dir() {
            return Err(Error::Filesystem {
                message: format!(
                    "failed to change to code directory '{}': not a directory",
                    code_dir.display()
                ),
            });
        }

        if let Some(file) = self.find_match()? {
            return Ok(Target::Bundled {
                file,
                args: args.to_vec(),
            });
        }

        match args.split_first() {
            Some((program, rest)) => Ok(Target::PassThrough {
                program: program.clone(),
                args: rest.to_vec(),
            }),
            None => Err(Error::NoMatchingFile {
                dir: code_dir.display().to_string(),
                patterns: self.config.execution.patterns.clone(),
            }),
        }
    }

    /// First match of the first matching pattern, relative to the code dir.
    fn find_match(&self) -> Result<Option<PathBuf>> {
        let code_dir = self.code_dir();
        let escaped_root = glob::Pattern::escape(&code_dir.to_string_lossy());

        for pattern in &self.config.execution.patterns {
            let full_pattern = if Path::new(pattern).is_absolute() {
                pattern.clone()
            } else {
                format!("{}/{}", escaped_root.trim_end_matches('/'), pattern)
            };
            let paths = glob::glob(&full_pattern).map_err(|source| Error::Glob {
                pattern: pattern.clone(),
                source,
            })?;

            // Unreadable entries are skipped rather than treated as errors.
            let first = paths.filter_map(|p| p.ok()).next();
            if let Some(path) = first {
                let relative = path.strip_prefix(code_dir).unwrap_or(&path).to_path_buf();
                debug!("Pattern {:?} matched {}", pattern, relative.display());
                return Ok(Some(relative));
            }
            debug!("Pattern {:?} matched nothing", pattern);
        }

        Ok(None)
    }

    /// Resolve and run, returning the child's outcome.
    ///
    /// A child that exits unsuccessfully yields [`Error::ChildExit`].
    pub fn execute(&self, args: &[String]) -> Result<Outcome> {
        let target = self.resolve(args)?;
        let program = target.program();

        let outcome = match target {
            Target::Bundled { file, args } => {
                if self.config.execution.should_make_executable() {
                    self.make_executable(&file)?;
                }
                info!("Running {} {:?}", program, args);
                let status = self.run_bundled(&file, &args)?;
                Outcome::Bundled { file, status }
            }
            Target::PassThrough {
                program: name,
                args,
            } => {
                info!("No bundled program found, passing through to {}", name);
                let mut command = Command::new(&name);
                command.args(&args).current_dir(self.code_dir());
                let status = spawn_and_wait(&mut command, &name)?;
                Outcome::PassThrough {
                    program: name,
                    status,
                }
            }
        };

        let status = outcome.status();
        if !status.success() {
            return Err(Error::ChildExit { program, status });
        }
        Ok(outcome)
    }

    /// Set the executable bits on `file`, relative to the code directory.
    pub fn make_executable(&self, file: &Path) -> Result<()> {
        let display = file.display().to_string();

        if self.config.execution.should_use_sudo() {
            let status = Command::new("sudo")
                .args(["chmod", "+x"])
                .arg(file)
                .current_dir(self.code_dir())
                .status()
                .map_err(|e| Error::Permission {
                    file: display.clone(),
                    elevated: true,
                    message: e.to_string(),
                })?;
            if !status.success() {
                return Err(Error::Permission {
                    file: display,
                    elevated: true,
                    message: status.to_string(),
                });
            }
            return Ok(());
        }

        set_executable(&self.code_dir().join(file)).map_err(|e| Error::Permission {
            file: display,
            elevated: false,
            message: e.to_string(),
        })
    }

    fn run_bundled(&self, file: &Path, args: &[String]) -> Result<ExitStatus> {
        // Resolved against the child's working directory, so the program
        // sees itself as `./<file>` in its argv[0].
        let program = Path::new(".").join(file);
        let mut command = Command::new(&program);
        command.args(args).current_dir(self.code_dir());

        match command.status() {
            Ok(status) => Ok(status),
            Err(e) if is_exec_format_error(&e) => {
                // No interpreter line: run it the way a POSIX shell would.
                debug!("{} is not a binary, running it with /bin/sh", program.display());
                let mut command = Command::new("/bin/sh");
                command.arg(&program).args(args).current_dir(self.code_dir());
                spawn_and_wait(&mut command, &program.display().to_string())
            }
            Err(e) => Err(Error::Launch {
                program: program.display().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn spawn_and_wait(command: &mut Command, program: &str) -> Result<ExitStatus> {
    command.status().map_err(|e| Error::Launch {
        program: program.to_string(),
        message: e.to_string(),
    })
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn set_executable(path: &Path) -> std::io::Result<()> {
    // No executable bit to set; just make sure the file is reachable.
    fs::metadata(path).map(|_| ())
}

#[cfg(unix)]
fn is_exec_format_error(e: &std::io::Error) -> bool {
    // ENOEXEC is 8 on every supported Unix.
    e.raw_os_error() == Some(8)
}

#[cfg(not(unix))]
fn is_exec_format_error(_e: &std::io::Error) -> bool {
    false
}
