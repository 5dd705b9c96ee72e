//! Process hardening for render children
//!
//! Optional POSIX resource limits applied between fork and exec, and
//! process-group termination so helper processes spawned by the toolchain
//! (ffmpeg) die with it. None of this is a security boundary.

/// Resource ceilings for one render process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceLimits {
    /// RLIMIT_CPU in seconds
    pub cpu_seconds: Option<u64>,
    /// RLIMIT_AS in bytes (Linux only)
    pub memory_bytes: Option<u64>,
}

impl ResourceLimits {
    pub fn is_unlimited(&self) -> bool {
        self.cpu_seconds.is_none() && self.memory_bytes.is_none()
    }
}

/// Installs `limits` on `command` so they apply to the spawned child
#[cfg(unix)]
pub(crate) fn install(command: &mut tokio::process::Command, limits: ResourceLimits) {
    if limits.is_unlimited() {
        return;
    }

    // SAFETY: the closure only calls setrlimit, which is async-signal-safe,
    // and allocates nothing between fork and exec.
    unsafe {
        command.pre_exec(move || apply(limits));
    }
}

#[cfg(not(unix))]
pub(crate) fn install(_command: &mut tokio::process::Command, limits: ResourceLimits) {
    if !limits.is_unlimited() {
        tracing::warn!("Resource limits are only enforced on Unix platforms");
    }
}

#[cfg(unix)]
fn apply(limits: ResourceLimits) -> std::io::Result<()> {
    if let Some(secs) = limits.cpu_seconds {
        let cpu = rlimit(secs);
        // SAFETY: `cpu` is a valid rlimit for the duration of the call.
        if unsafe { libc::setrlimit(libc::RLIMIT_CPU, &cpu) } != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    if let Some(bytes) = limits.memory_bytes {
        let address_space = rlimit(bytes);
        // SAFETY: as above.
        if unsafe { libc::setrlimit(libc::RLIMIT_AS, &address_space) } != 0 {
            return Err(std::io::Error::last_os_error());
        }
    }

    Ok(())
}

#[cfg(unix)]
fn rlimit(value: u64) -> libc::rlimit {
    libc::rlimit {
        rlim_cur: value as libc::rlim_t,
        rlim_max: value as libc::rlim_t,
    }
}

/// Sends SIGKILL to every process in the group led by `pid`
#[cfg(unix)]
pub(crate) fn kill_process_group(pid: u32) -> std::io::Result<()> {
    // SAFETY: killpg has no memory-safety preconditions.
    if unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) } != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ESRCH) {
            return Ok(());
        }
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        assert!(ResourceLimits::default().is_unlimited());
        assert!(
            !ResourceLimits {
                cpu_seconds: Some(10),
                memory_bytes: None,
            }
            .is_unlimited()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cpu_limit_is_visible_to_child() {
        let mut command = tokio::process::Command::new("/bin/sh");
        command.arg("-c").arg("ulimit -t");
        install(
            &mut command,
            ResourceLimits {
                cpu_seconds: Some(7),
                memory_bytes: None,
            },
        );

        let output = command.output().await.unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "7");
    }

    #[cfg(unix)]
    #[test]
    fn test_kill_missing_group_is_ok() {
        // PIDs this large are never allocated on Linux (pid_max <= 2^22).
        assert!(kill_process_group(0x7fff_fff0).is_ok());
    }
}
