use clap::{Parser, ValueEnum};
use code_exec::{ExecutorConfig, PythonIsolation, ResourceLimits};
use code_exec_server::{create_app, run_server};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Isolation {
    /// Restricted interpreter inside the server process
    InProcess,
    /// External python3 process with resource limits
    Process,
}

impl From<Isolation> for PythonIsolation {
    fn from(isolation: Isolation) -> Self {
        match isolation {
            Isolation::InProcess => PythonIsolation::InProcess,
            Isolation::Process => PythonIsolation::Process,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to listen on
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Maximum number of concurrent executions
    #[arg(short, long, default_value = "10")]
    max_concurrent: usize,

    /// Wall-clock deadline per execution in seconds
    #[arg(short, long, default_value = "5")]
    timeout_secs: u64,

    /// CPU time limit in seconds
    #[arg(long, default_value = "10")]
    cpu_time_limit: u32,

    /// Address-space limit in bytes for interpreter processes
    #[arg(long)]
    memory_limit: Option<u64>,

    /// File size limit in bytes
    #[arg(long, default_value = "10485760")] // 10MB
    file_size_limit: u64,

    /// Directory for temporary source files
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Node.js interpreter command
    #[arg(long, default_value = "node")]
    node: String,

    /// Python interpreter command, used with `--python-isolation process`
    #[arg(long, default_value = "python3")]
    python: String,

    /// Where Python submissions run
    #[arg(long, value_enum, default_value = "in-process")]
    python_isolation: Isolation,
}

impl Args {
    fn executor_config(self) -> ExecutorConfig {
        ExecutorConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            max_concurrent_executions: self.max_concurrent,
            limits: ResourceLimits {
                cpu_time: self.cpu_time_limit,
                memory: self.memory_limit,
                file_size: self.file_size_limit,
            },
            scratch_dir: self.scratch_dir,
            node_command: self.node,
            python_command: self.python,
            python_isolation: self.python_isolation.into(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let addr = args.addr;
    let config = args.executor_config();
    info!(
        "Executor config: timeout={:?} max_concurrent={} python_isolation={:?}",
        config.timeout, config.max_concurrent_executions, config.python_isolation
    );

    let app = create_app(config);
    run_server(app, addr).await?;

    Ok(())
}
