use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::thread::ScopedJoinHandle;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::args::build_args;
use crate::config::{self, Config};
use crate::error::{JqError, SetupError};
use crate::params::JqParams;
use crate::platform;
use crate::result::JqResult;

/// How often a running jq process checks its cancellation token
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Exit code reported when jq was terminated by a signal
const NO_EXIT_CODE: i32 = -1;

/// Process-wide executor, resolved once on first use
static GLOBAL: OnceLock<Result<JqExecutor, SetupError>> = OnceLock::new();

/// Execute jq queries against JSON input
///
/// Holds the jq binary and the directory used for cached query files.
/// Cloning is cheap and every call spawns its own process, so one executor
/// can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JqExecutor {
    binary: PathBuf,
    cache_dir: PathBuf,
}

impl JqExecutor {
    /// Create an executor for `binary`, caching query files in the temp dir
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            cache_dir: std::env::temp_dir(),
        }
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Resolve the binary described by `config`
    ///
    /// # Errors
    /// * `SetupError` - unsupported platform, missing binary, or the binary
    ///   could not be made executable
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let cache_dir = config.cache.dir();
        let binary = platform::resolve_binary(&config.binary, &cache_dir)?;
        Ok(Self { binary, cache_dir })
    }

    /// The process-wide executor built from the user config file
    ///
    /// Resolution runs once; a failure is returned to every later caller.
    pub fn global() -> Result<&'static JqExecutor, JqError> {
        GLOBAL
            .get_or_init(|| {
                let config_result = config::load_config();
                if let Some(warning) = &config_result.warning {
                    log::warn!("{}", warning);
                }
                JqExecutor::from_config(&config_result.config)
            })
            .as_ref()
            .map_err(|e| JqError::Setup(e.clone()))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Run `filter` over `json` with default options and return stdout
    ///
    /// Raw output is on, so string results come back unquoted. The exit code
    /// and stderr are discarded; use [`JqExecutor::execute`] to see them.
    pub fn query(&self, json: &str, filter: &str) -> Result<String, JqError> {
        let params = JqParams::with_json(json, filter)?;
        Ok(self.execute(&params)?.into_stdout())
    }

    /// Execute a jq query described by `params`
    ///
    /// # Returns
    /// * `Ok(JqResult)` - jq ran; check `exit_code()` for its verdict
    /// * `Err(JqError)` - a precondition failed or the process could not run
    pub fn execute(&self, params: &JqParams) -> Result<JqResult, JqError> {
        self.run(params, None)
    }

    /// Execute like [`JqExecutor::execute`], killing jq if `cancel_token` fires
    pub fn execute_with_cancel(
        &self,
        params: &JqParams,
        cancel_token: &CancellationToken,
    ) -> Result<JqResult, JqError> {
        self.run(params, Some(cancel_token))
    }

    /// Execute on tokio's blocking pool so async callers are not blocked
    pub async fn execute_async(&self, params: JqParams) -> Result<JqResult, JqError> {
        let executor = self.clone();
        tokio::task::spawn_blocking(move || executor.execute(&params))
            .await
            .map_err(|e| JqError::Io(io::Error::other(e)))?
    }

    fn run(
        &self,
        params: &JqParams,
        cancel_token: Option<&CancellationToken>,
    ) -> Result<JqResult, JqError> {
        if !self.binary.is_file() {
            return Err(JqError::BinaryNotFound(self.binary.clone()));
        }
        params.check_input()?;

        let args = build_args(params, &self.cache_dir)?;

        if cancel_token.is_some_and(CancellationToken::is_cancelled) {
            return Err(JqError::Cancelled);
        }

        log::debug!("Running {} {:?}", self.binary.display(), args);

        let stdin = if params.json_input().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(JqError::Spawn)?;

        let child_stdin = child.stdin.take();
        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();

        // Feed and drain on separate threads so a large input or output
        // never fills a pipe while we wait on the other one.
        std::thread::scope(|scope| -> Result<JqResult, JqError> {
            let writer = scope.spawn(move || feed(child_stdin, params.json_input()));
            let stdout_reader = scope.spawn(move || drain(child_stdout));
            let stderr_reader = scope.spawn(move || drain(child_stderr));

            let status = wait(&mut child, cancel_token)?;

            let stdout = join(stdout_reader)?;
            let stderr = join(stderr_reader)?;
            join(writer)?;

            let code = exit_code(status);
            log::debug!("jq exited with {}", code);

            Ok(JqResult::new(
                code,
                &String::from_utf8_lossy(&stdout),
                &String::from_utf8_lossy(&stderr),
            ))
        })
    }
}

/// Write the JSON input and close stdin
fn feed(stdin: Option<ChildStdin>, json: Option<&str>) -> io::Result<()> {
    let (Some(mut stdin), Some(json)) = (stdin, json) else {
        return Ok(());
    };

    match stdin.write_all(json.as_bytes()) {
        // jq may exit before reading everything, e.g. on a compile error
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn drain<R: Read>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn join<T>(handle: ScopedJoinHandle<'_, io::Result<T>>) -> Result<T, JqError> {
    let result = handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("jq pipe thread panicked")));
    Ok(result?)
}

fn wait(
    child: &mut Child,
    cancel_token: Option<&CancellationToken>,
) -> Result<ExitStatus, JqError> {
    let Some(token) = cancel_token else {
        return Ok(child.wait()?);
    };

    loop {
        if token.is_cancelled() {
            log::debug!("Cancelling jq process {}", child.id());
            // Either call fails only if the process already exited
            let _ = child.kill();
            let _ = child.wait();
            return Err(JqError::Cancelled);
        }

        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        std::thread::sleep(CANCEL_POLL_INTERVAL);
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(NO_EXIT_CODE)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
