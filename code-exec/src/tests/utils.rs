pub mod defaults {
    use crate::{ExecutorConfig, PythonIsolation, ResourceLimits};
    use std::path::Path;
    use tokio::time::Duration;

    pub fn default_test_limits() -> ResourceLimits {
        ResourceLimits {
            cpu_time: 5,
            memory: None,
            file_size: 10 * 1024 * 1024, // 10MB
        }
    }

    pub fn default_timeout() -> Duration {
        Duration::from_secs(5)
    }

    /// Config whose temporary artifacts land in `scratch`, so tests can
    /// check that nothing is left behind.
    pub fn test_config(scratch: &Path) -> ExecutorConfig {
        ExecutorConfig {
            timeout: default_timeout(),
            max_concurrent_executions: 4,
            limits: default_test_limits(),
            scratch_dir: Some(scratch.to_path_buf()),
            ..ExecutorConfig::default()
        }
    }

    pub fn process_python_config(scratch: &Path) -> ExecutorConfig {
        ExecutorConfig {
            python_isolation: PythonIsolation::Process,
            ..test_config(scratch)
        }
    }

    pub fn leftover_artifacts(scratch: &Path) -> usize {
        std::fs::read_dir(scratch).map(|dir| dir.count()).unwrap_or(0)
    }
}
