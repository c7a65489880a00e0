use std::process::{Command, ExitCode};
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use svroll_core::{DeployConfig, MetricsSink, Plan, ServiceEnumerator};
use svroll_exec::{FileLockSource, GlobServiceEnumerator, ProcessRestartExecutor, StdioLogSink};
use svroll_metrics::MetricsCollector;
use svroll_rollout::PhaseController;

/// svroll — restarts glob-discovered supervised services using a
/// canary-then-rollout strategy.
#[derive(Parser)]
#[command(name = "svroll", about = "Canary-then-rollout restart orchestrator", version)]
struct Cli {
    /// Glob pattern matched against the supervision directory.
    #[arg(long)]
    pattern: String,

    /// Fraction of services restarted first, as canaries.
    #[arg(long, default_value_t = 0.001)]
    canary_ratio: f64,

    /// Rollout concurrency, as a fraction of the rollout set.
    #[arg(long, default_value_t = 0.2)]
    chunk_ratio: f64,

    /// Fraction of canaries allowed to time out without failing the deploy.
    #[arg(long, default_value_t = 0.0)]
    canary_timeout_tolerance: f64,

    /// Fraction of the full service set allowed to time out.
    #[arg(long, default_value_t = 0.0)]
    timeout_tolerance: f64,

    /// Per-unit restart wait, in seconds.
    #[arg(long, default_value_t = 90)]
    timeout: u64,

    /// Shell command run once the deploy finishes, success or abort.
    #[arg(long)]
    oncomplete: Option<String>,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,

    /// Directory globbed for services.
    #[arg(long, default_value = "/etc/service")]
    supervision_dir: String,

    /// Path whose presence turns a run into a no-op success.
    #[arg(long, default_value = "/var/lock/dont-sv-rollout")]
    lock_file: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "svroll=debug" } else { "svroll=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = DeployConfig {
        canary_ratio: cli.canary_ratio,
        chunk_ratio: cli.chunk_ratio,
        canary_timeout_tolerance: cli.canary_timeout_tolerance,
        timeout_tolerance: cli.timeout_tolerance,
        per_unit_timeout_seconds: cli.timeout,
    };

    if let Err(err) = config.validate() {
        eprintln!("svroll: invalid configuration: {err}");
        return ExitCode::from(2);
    }

    let enumerator = GlobServiceEnumerator::new(cli.supervision_dir.clone());
    let services = match enumerator.enumerate(&cli.pattern) {
        Ok(services) => services,
        Err(err) => {
            error!("failed to enumerate services for pattern {:?}: {err}", cli.pattern);
            return ExitCode::from(1);
        }
    };

    info!(count = services.len(), pattern = %cli.pattern, "enumerated services");

    let plan = Plan::new(&services, &config);
    let executor = Arc::new(ProcessRestartExecutor::new());
    let log = Arc::new(StdioLogSink);
    let metrics = Arc::new(MetricsCollector::new());
    let lock = Arc::new(FileLockSource::new(cli.lock_file.clone()));

    let controller = PhaseController::new(
        plan,
        executor,
        log,
        Some(metrics.clone() as Arc<dyn MetricsSink>),
        lock,
        cli.timeout,
    );

    let result = controller.run().await;
    info!(result = ?result, "deploy finished");

    if let Some(command) = &cli.oncomplete {
        run_completion_handler(command);
    }

    ExitCode::from(result.exit_code() as u8)
}

/// Runs the user-supplied `--oncomplete` command through a shell, logging
/// but not propagating its failure — the deploy's own result already
/// decided the process exit code.
fn run_completion_handler(command: &str) {
    info!(command, "running completion handler");
    match Command::new("sh").arg("-c").arg(command).status() {
        Ok(status) if status.success() => {}
        Ok(status) => error!(command, %status, "completion handler exited non-zero"),
        Err(err) => error!(command, %err, "failed to spawn completion handler"),
    }
}
