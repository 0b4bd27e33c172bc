//! Preview process lifecycle. At most one preview runs at a time; a new
//! snapshot tears the old one down before the interchange file is
//! rewritten.

use std::io;
use std::path::Path;
use std::process::Child;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long to wait for a killed preview to be reaped before giving up.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Spawns preview processes. Split out as a trait so tests can stand in
/// fake children without a GPU or a second binary.
pub trait PreviewLauncher {
    fn launch(&mut self, model_path: &Path) -> io::Result<Child>;
}

/// Launches the current executable in preview mode.
pub struct ExeLauncher;

impl PreviewLauncher for ExeLauncher {
    fn launch(&mut self, model_path: &Path) -> io::Result<Child> {
        let exe = std::env::current_exe()?;
        std::process::Command::new(exe)
            .arg("preview")
            .arg(model_path)
            .spawn()
    }
}

/// Owns the single live preview child, if any.
pub struct PreviewSupervisor<L: PreviewLauncher> {
    launcher: L,
    child: Option<Child>,
}

impl<L: PreviewLauncher> PreviewSupervisor<L> {
    pub fn new(launcher: L) -> Self {
        PreviewSupervisor {
            launcher,
            child: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.child.is_some()
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Stop any running preview, then start one on the given model file.
    pub fn restart(&mut self, model_path: &Path) -> io::Result<()> {
        self.shutdown();
        let child = self.launcher.launch(model_path)?;
        debug!(pid = child.id(), "preview spawned");
        self.child = Some(child);
        Ok(())
    }

    /// Kill the live preview and wait briefly for it to be reaped. A
    /// child that outlives the grace period is killed again and dropped;
    /// the capture loop must not block on it.
    pub fn shutdown(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        let pid = child.id();
        if let Err(e) = child.kill() {
            // Already exited is fine; anything else we still try to reap.
            debug!(pid, error = %e, "preview kill failed");
        }
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!(pid, %status, "preview stopped");
                    return;
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        warn!(pid, "preview did not exit within grace period");
                        let _ = child.kill();
                        return;
                    }
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(e) => {
                    warn!(pid, error = %e, "could not reap preview");
                    return;
                }
            }
        }
    }
}

impl<L: PreviewLauncher> Drop for PreviewSupervisor<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct SleepLauncher {
        launched: Vec<PathBuf>,
    }

    impl PreviewLauncher for SleepLauncher {
        fn launch(&mut self, model_path: &Path) -> io::Result<Child> {
            self.launched.push(model_path.to_path_buf());
            std::process::Command::new("sleep").arg("30").spawn()
        }
    }

    #[test]
    fn restart_replaces_the_live_child() {
        let mut supervisor = PreviewSupervisor::new(SleepLauncher { launched: vec![] });
        assert!(!supervisor.is_active());

        supervisor.restart(Path::new("a.stl")).unwrap();
        assert!(supervisor.is_active());
        supervisor.restart(Path::new("b.stl")).unwrap();
        assert!(supervisor.is_active());
        assert_eq!(
            supervisor.launcher.launched,
            vec![PathBuf::from("a.stl"), PathBuf::from("b.stl")]
        );

        supervisor.shutdown();
        assert!(!supervisor.is_active());
    }

    #[test]
    fn shutdown_without_child_is_a_no_op() {
        let mut supervisor = PreviewSupervisor::new(SleepLauncher { launched: vec![] });
        supervisor.shutdown();
        assert!(!supervisor.is_active());
    }
}
