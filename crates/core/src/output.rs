//! Formatting and writing of the rendered source.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::{Result, SdkgenError};

/// Post-processes rendered source before it is written.
pub trait SourceFormatter {
    fn format(&self, file_name: &str, source: String) -> Result<String>;
}

/// Leaves the source untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl SourceFormatter for NoopFormatter {
    fn format(&self, _file_name: &str, source: String) -> Result<String> {
        Ok(source)
    }
}

/// Pipes the source through an external program such as `goimports`.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: PathBuf,
}

impl CommandFormatter {
    /// Formatters tried, in order, when no program is configured.
    pub const FALLBACKS: [&'static str; 2] = ["goimports", "gofmt"];

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Locate `preferred` on `PATH`, then each of [`Self::FALLBACKS`].
    pub fn discover(preferred: &str) -> Option<Self> {
        std::iter::once(preferred)
            .chain(Self::FALLBACKS)
            .find_map(|name| which::which(name).ok())
            .map(Self::new)
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl SourceFormatter for CommandFormatter {
    fn format(&self, file_name: &str, source: String) -> Result<String> {
        let failed = |message: String| SdkgenError::Format {
            program: self.program_name(),
            message,
        };

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| failed(err.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|err| failed(err.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|err| failed(err.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!(
                "{file_name}: {} ({})",
                stderr.trim(),
                output.status
            )));
        }

        debug!(program = %self.program.display(), file_name, "Formatted generated source.");
        String::from_utf8(output.stdout).map_err(|err| failed(err.to_string()))
    }
}

/// The formatter named by `config`, or [`NoopFormatter`] when formatting is
/// disabled or no formatter binary is installed.
pub fn select_formatter(config: &GeneratorConfig) -> Box<dyn SourceFormatter> {
    let Some(program) = config.formatter_program() else {
        debug!("Source formatting disabled.");
        return Box::new(NoopFormatter);
    };
    match CommandFormatter::discover(program) {
        Some(formatter) => Box::new(formatter),
        None => {
            warn!(
                program,
                "No Go formatter found on PATH, writing unformatted source."
            );
            Box::new(NoopFormatter)
        }
    }
}

/// Create `dir` if needed and write `contents` to `dir/file_name`.
pub fn write_output(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| SdkgenError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    fs::write(&path, contents).map_err(|source| SdkgenError::Write {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote generated client.");
    Ok(path)
}
