//! Executor configuration
//!
//! Defines the toolchain command contract, the temporary root for job
//! working directories, the render timeout and the optional resource limits.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::limits::ResourceLimits;

/// Default wall-clock ceiling for one render
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default number of trailing diagnostic characters kept in failures
pub const DEFAULT_DIAGNOSTIC_TAIL: usize = 2000;

/// Executor configuration
///
/// Built once at service start and shared by every job.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Shared root under which job working directories are created
    pub temp_root: PathBuf,

    /// Interpreter that hosts the rendering toolchain (e.g., "python3")
    pub program: String,

    /// Arguments placed before the fixed render arguments (e.g., ["-m", "manim"])
    pub program_args: Vec<String>,

    /// Quality flag passed to the toolchain
    pub quality_flag: String,

    /// Scene class the source must define
    pub entry_point: String,

    /// Extension of the produced video, without the dot
    pub media_extension: String,

    /// Maximum time a render can run before it is killed
    pub timeout: Duration,

    /// Number of trailing characters of stderr kept in a failure
    pub diagnostic_tail: usize,

    /// Cap on captured bytes per output stream; excess output is drained and dropped
    pub max_output_bytes: usize,

    /// Optional POSIX resource limits applied to the render process
    pub limits: ResourceLimits,
}

impl ExecutorConfig {
    /// Creates a configuration rooted at `temp_root` with default settings
    pub fn new(temp_root: PathBuf) -> Self {
        Self {
            temp_root,
            program: "python3".to_string(),
            program_args: vec!["-m".to_string(), "manim".to_string()],
            quality_flag: "-ql".to_string(),
            entry_point: "GeneratedScene".to_string(),
            media_extension: "mp4".to_string(),
            timeout: DEFAULT_TIMEOUT,
            diagnostic_tail: DEFAULT_DIAGNOSTIC_TAIL,
            max_output_bytes: 8 * 1024 * 1024,
            limits: ResourceLimits::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Every variable is optional:
    /// - REEL_TEMP_ROOT (default: <system temp>/manim_mcp)
    /// - REEL_PYTHON (default: python3)
    /// - REEL_RENDER_TIMEOUT (seconds, default: 300)
    /// - REEL_STDERR_TAIL (characters, default: 2000)
    /// - REEL_CPU_LIMIT (seconds of CPU time, default: unlimited)
    /// - REEL_MEMORY_LIMIT (bytes of address space, default: unlimited)
    ///
    /// Values that are present but unparsable are reported as errors.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("REEL_TEMP_ROOT") {
            config.temp_root = PathBuf::from(root);
        }

        if let Ok(program) = std::env::var("REEL_PYTHON") {
            config.program = program;
        }

        if let Some(secs) = env_parse::<u64>("REEL_RENDER_TIMEOUT")? {
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(tail) = env_parse::<usize>("REEL_STDERR_TAIL")? {
            config.diagnostic_tail = tail;
        }

        config.limits = ResourceLimits {
            cpu_seconds: env_parse("REEL_CPU_LIMIT")?,
            memory_bytes: env_parse("REEL_MEMORY_LIMIT")?,
        };

        Ok(config)
    }

    /// Sets the toolchain command (builder style, mostly for tests)
    pub fn with_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.program = program.into();
        self.program_args = args;
        self
    }

    /// Sets the render timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.temp_root.as_os_str().is_empty() {
            anyhow::bail!("temp_root cannot be empty");
        }

        if self.program.trim().is_empty() {
            anyhow::bail!("program cannot be empty");
        }

        if !is_identifier(&self.entry_point) {
            anyhow::bail!(
                "entry_point must be a valid class name, got '{}'",
                self.entry_point
            );
        }

        if self.media_extension.is_empty() || self.media_extension.starts_with('.') {
            anyhow::bail!("media_extension must be a bare extension such as 'mp4'");
        }

        if self.timeout.is_zero() {
            anyhow::bail!("timeout must be greater than 0");
        }

        if self.diagnostic_tail == 0 {
            anyhow::bail!("diagnostic_tail must be greater than 0");
        }

        if self.max_output_bytes < self.diagnostic_tail {
            anyhow::bail!("max_output_bytes must be at least diagnostic_tail");
        }

        Ok(())
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("manim_mcp"))
    }
}

fn env_parse<T: FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.diagnostic_tail, 2000);
        assert_eq!(config.entry_point, "GeneratedScene");
        assert_eq!(config.quality_flag, "-ql");
        assert!(config.temp_root.ends_with("manim_mcp"));
        assert!(config.limits.is_unlimited());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ExecutorConfig::default();
        assert!(config.validate().is_ok());

        config.entry_point = "Generated Scene".to_string();
        assert!(config.validate().is_err());
        config.entry_point = "GeneratedScene".to_string();

        config.media_extension = ".mp4".to_string();
        assert!(config.validate().is_err());
        config.media_extension = "mp4".to_string();

        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.timeout = DEFAULT_TIMEOUT;

        config.program = "  ".to_string();
        assert!(config.validate().is_err());
        config.program = "python3".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_command() {
        let config = ExecutorConfig::default()
            .with_command("/bin/sh", vec!["-c".to_string(), "exit 0".to_string()])
            .with_timeout(Duration::from_secs(1));

        assert_eq!(config.program, "/bin/sh");
        assert_eq!(config.program_args, vec!["-c", "exit 0"]);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("GeneratedScene"));
        assert!(is_identifier("_Scene2"));
        assert!(!is_identifier("2Scene"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("Scene-1"));
    }
}
