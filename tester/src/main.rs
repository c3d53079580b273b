//! Leader-Loss Test Runner
//!
//! Runs one lost-leader scenario, or a suite of them, against a local
//! docker-compose Kafka project:
//! - Removes leftover containers and starts zookeeper plus the broker fleet
//! - Finds the partition leader and takes it out with the configured fault
//! - Prints consumer, producer and follower logs for offline analysis
//!
//! Containers are left running when a scenario fails.

use anyhow::Context;
use clap::Parser;
use std::time::Duration;

use tester::{HarnessContext, HarnessSession, RetryPolicy, TestScenarios, Timings};

#[derive(Parser)]
#[command(name = "tester")]
#[command(about = "Kafka leader-loss fault injection harness")]
struct Args {
    /// Scenario or suite to run, or `list`
    #[arg(long, env = "KAFKA_FAILOVER_SCENARIO", default_value = "all")]
    scenario: String,

    /// docker-compose project name
    #[arg(long, env = "KAFKA_FAILOVER_PROJECT_NAME", default_value = "kafkanetworkfailuretests")]
    project_name: String,

    /// docker-compose file, if not the default one
    #[arg(long, env = "KAFKA_FAILOVER_COMPOSE_FILE")]
    compose_file: Option<String>,

    /// Topic whose leader is taken out
    #[arg(long, env = "KAFKA_FAILOVER_TOPIC", default_value = "test-topic")]
    topic: String,

    /// Partition of the topic
    #[arg(long, env = "KAFKA_FAILOVER_PARTITION", default_value = "0")]
    partition: u32,

    /// ZooKeeper connect string
    #[arg(long, env = "KAFKA_FAILOVER_ZOOKEEPER", default_value = "localhost:2181")]
    zookeeper: String,

    /// Path to kafka-run-class.sh
    #[arg(
        long,
        env = "KAFKA_FAILOVER_RUN_CLASS",
        default_value = "/tmp/kafka_2.12-0.10.2.1/bin/kafka-run-class.sh"
    )]
    run_class: String,

    /// Number of broker containers
    #[arg(long, env = "KAFKA_FAILOVER_BROKERS", default_value = "3")]
    brokers: u32,

    /// Log level for the harness (trace, debug, info, warn, error)
    #[arg(long, env = "KAFKA_FAILOVER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable verbose tracing output
    #[arg(long, env = "KAFKA_FAILOVER_VERBOSE")]
    verbose: bool,

    /// Producer runtime before the fault
    #[arg(long, env = "KAFKA_FAILOVER_WARMUP_SECS", default_value = "10")]
    warmup_secs: u64,

    /// Partition state samples taken after the fault
    #[arg(long, env = "KAFKA_FAILOVER_DWELL_ITERATIONS", default_value = "20")]
    dwell_iterations: u32,

    /// Seconds between partition state samples
    #[arg(long, env = "KAFKA_FAILOVER_DWELL_INTERVAL_SECS", default_value = "2")]
    dwell_interval_secs: u64,

    /// Seconds the consumer gets to read the backlog
    #[arg(long, env = "KAFKA_FAILOVER_CONSUME_SECS", default_value = "180")]
    consume_secs: u64,

    /// Partition state polls while waiting for the cluster
    #[arg(long, env = "KAFKA_FAILOVER_DISCOVERY_ATTEMPTS", default_value = "20")]
    discovery_attempts: u32,
}

impl Args {
    fn session(&self) -> HarnessSession {
        HarnessSession {
            project_name: self.project_name.clone(),
            compose_file: self.compose_file.clone(),
            topic: self.topic.clone(),
            partition: self.partition,
            zookeeper: self.zookeeper.clone(),
            run_class: self.run_class.clone(),
            broker_count: self.brokers,
            ..HarnessSession::default()
        }
    }

    fn timings(&self) -> Timings {
        Timings {
            discovery: RetryPolicy::new(self.discovery_attempts, Duration::from_secs(1)),
            warmup: Duration::from_secs(self.warmup_secs),
            dwell_iterations: self.dwell_iterations,
            dwell_interval: Duration::from_secs(self.dwell_interval_secs),
            consume_wait: Duration::from_secs(self.consume_secs),
            ..Timings::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    let args = Args::parse();

    shared::logging::init_tracing(args.log_level.as_deref(), args.verbose);

    if args.scenario == "list" {
        for name in TestScenarios::available_scenarios() {
            println!("{name}");
        }
        return Ok(());
    }

    let session = args.session();
    tracing::info!("🧪 Starting leader-loss harness: {}", session);

    let ctx = HarnessContext::from_session(session);
    let scenarios = TestScenarios::new(args.timings());

    let reports = scenarios
        .run_scenario(&args.scenario, &ctx)
        .await
        .with_context(|| format!("Test scenario '{}' failed", args.scenario))?;

    let mut stdout = std::io::stdout().lock();
    for report in &reports {
        tracing::info!(
            "✅ {} completed: leader {} taken out with {}",
            report.name,
            report.cluster.leader,
            report.strategy
        );
        report
            .logs
            .write_to(&mut stdout)
            .context("Failed to write captured logs")?;
    }

    tracing::info!("🏁 Leader-loss testing completed");
    Ok(())
}
