use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use authmark_sdk::{AuthError, AuthOptions, CognitoClient, ConnectorConfig};
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug, Clone)]
#[command(name = "authmark-loadtest")]
#[command(about = "Password-authentication load test tool")]
struct Args {
    /// Region of the target user pool.
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Endpoint override (e.g. a local mock-cognito instance).
    #[arg(long)]
    endpoint: Option<String>,

    /// App client id to authenticate against.
    #[arg(long, default_value = "local-loadtest")]
    client_id: String,

    /// App client secret, for confidential clients only.
    #[arg(long)]
    client_secret: Option<String>,

    #[arg(long, default_value = "loadtest")]
    username: String,

    /// Password; falls back to the AUTHMARK_PASSWORD environment variable.
    #[arg(long)]
    password: Option<String>,

    /// Value forwarded to the provider as ClientMetadata["run"].
    #[arg(long)]
    tag: Option<String>,

    /// Number of concurrent virtual users.
    #[arg(long, default_value_t = 10)]
    vus: usize,

    #[arg(long, default_value_t = 30)]
    duration_seconds: u64,

    /// Per-VU request rate; 0 means unthrottled.
    #[arg(long, default_value_t = 0)]
    rate_per_vu: u64,

    /// Verify a single authentication before spawning the VUs.
    #[arg(long, default_value_t = false)]
    skip_preflight: bool,
}

#[derive(Default)]
struct Metrics {
    attempts: AtomicU64,
    successes: AtomicU64,
    challenges: AtomicU64,
    errors: AtomicU64,
    latencies_us: Mutex<Vec<u64>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let password = match args.password.clone() {
        Some(p) => p,
        None => std::env::var("AUTHMARK_PASSWORD")
            .map_err(|_| anyhow!("no password given: pass --password or set AUTHMARK_PASSWORD"))?,
    };

    let mut config = ConnectorConfig::from_env(&args.region);
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.as_str());
    }
    // One shared handle: authenticate calls multiplex over its pooled transport.
    let client = CognitoClient::with_config(config)?;

    let mut options = AuthOptions::new();
    if let Some(secret) = &args.client_secret {
        options = options.with_client_secret(secret.as_str());
    }
    if let Some(tag) = &args.tag {
        options = options.with_metadata("run", tag.as_str());
    }

    println!(
        "Starting auth load test: endpoint={}, client_id={}, vus={}, duration={}s, rate_per_vu={} req/s",
        client.endpoint(),
        args.client_id,
        args.vus,
        args.duration_seconds,
        args.rate_per_vu
    );

    if !args.skip_preflight {
        preflight(&client, &args, &password, &options).await?;
        println!("Preflight: OK");
    }

    let metrics = Arc::new(Metrics::default());
    let deadline = Instant::now() + Duration::from_secs(args.duration_seconds);

    let mut tasks = Vec::with_capacity(args.vus);
    for _ in 0..args.vus {
        let client = client.clone();
        let args = args.clone();
        let password = password.clone();
        let options = options.clone();
        let metrics = metrics.clone();
        tasks.push(tokio::spawn(async move {
            run_vu(client, args, password, options, deadline, metrics).await;
        }));
    }

    for handle in tasks {
        if let Err(e) = handle.await {
            eprintln!("task join error: {e}");
            metrics.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    report_metrics(args.duration_seconds, &metrics).await;
    Ok(())
}

/// One authentication up front, so a misconfigured pool fails fast
/// instead of producing a report full of identical errors.
async fn preflight(
    client: &CognitoClient,
    args: &Args,
    password: &str,
    options: &AuthOptions,
) -> Result<()> {
    let tokens = client
        .authenticate_with_options(&args.username, password, &args.client_id, options)
        .await
        .map_err(|e| anyhow!("preflight authentication failed: {e}"))?;
    let map = tokens.into_key_values();
    if map.len() != 3 {
        return Err(anyhow!("preflight returned an unexpected token mapping"));
    }
    Ok(())
}

async fn run_vu(
    client: CognitoClient,
    args: Args,
    password: String,
    options: AuthOptions,
    deadline: Instant,
    metrics: Arc<Metrics>,
) {
    let mut ticker = if args.rate_per_vu > 0 {
        Some(tokio::time::interval(Duration::from_nanos(
            1_000_000_000_u64 / args.rate_per_vu.max(1),
        )))
    } else {
        None
    };

    while Instant::now() < deadline {
        if let Some(t) = ticker.as_mut() {
            t.tick().await;
        }

        metrics.attempts.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();
        match client
            .authenticate_with_options(&args.username, &password, &args.client_id, &options)
            .await
        {
            Ok(_) => {
                metrics.successes.fetch_add(1, Ordering::Relaxed);
                let latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
                metrics.latencies_us.lock().await.push(latency_us);
            }
            Err(AuthError::IncompleteChallenge { .. }) => {
                metrics.challenges.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::debug!(error = %e, "authentication attempt failed");
                metrics.errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

async fn report_metrics(duration_seconds: u64, metrics: &Arc<Metrics>) {
    let attempts = metrics.attempts.load(Ordering::Relaxed);
    let successes = metrics.successes.load(Ordering::Relaxed);
    let challenges = metrics.challenges.load(Ordering::Relaxed);
    let errors = metrics.errors.load(Ordering::Relaxed);

    let mut latencies = metrics.latencies_us.lock().await.clone();
    latencies.sort_unstable();

    let p = |q: f64| -> u64 {
        if latencies.is_empty() {
            return 0;
        }
        let idx = ((latencies.len() - 1) as f64 * q).round() as usize;
        latencies[idx]
    };

    let avg = if latencies.is_empty() {
        0.0
    } else {
        latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
    };

    let tps = successes as f64 / duration_seconds.max(1) as f64;

    println!("\n=== Auth load test report ===");
    println!("attempts={attempts} successes={successes} challenges={challenges} errors={errors}");
    println!("throughput={tps:.2} auth/s");
    println!(
        "latency_us: count={} avg={:.1} p50={} p95={} p99={} max={}",
        latencies.len(),
        avg,
        p(0.50),
        p(0.95),
        p(0.99),
        latencies.last().copied().unwrap_or(0),
    );
    if challenges > 0 {
        println!(
            "diagnostic: {challenges} attempts stopped at a provider challenge; those users cannot complete a plain password exchange"
        );
    }
}
