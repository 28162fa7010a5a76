use anyhow::{bail, Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use club_booking::api::dtos::requests::UpsertSessionRequest;
use club_booking::client::BookingClient;
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

const DURATION_SECS: u64 = 20;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const RACE_CAPACITY: i32 = 16;
const RACE_CONTENDERS: usize = 64;

struct Target {
    name: &'static str,
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let base_url = std::env::var("BENCH_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", base_url);

    let http = Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()?;
    let api = BookingClient::with_client(http.clone(), &base_url);

    if api.health().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", base_url).red().bold());
        return Ok(());
    }

    println!("\n{}", "⚙️  Setting up benchmark data...".yellow());
    let mut created = Vec::new();
    for offset in 1..=5 {
        let session = api.create_session(&bench_session("Benchmark Session", offset, None)).await?;
        created.push(session.id);
    }
    println!("{}", format!("✅ Created {} sessions.", created.len()).green());

    let targets = vec![
        Target { name: "Health Check", url: format!("{}/health", base_url) },
        Target { name: "Upcoming Sessions (Public Read)", url: format!("{}/api/sessions", base_url) },
        Target { name: "All Sessions (Admin Read)", url: format!("{}/api/admin/sessions", base_url) },
    ];

    let rps_stages = vec![10, 50, 200, 1000];

    for target in targets {
        println!("\n{}", "=".repeat(60));
        println!("Benchmarking Endpoint: {}", target.name.cyan().bold());
        println!("URL: {}", target.url);
        println!("{}", "=".repeat(60));

        println!("{:<10} | {:<15} | {:<15} | {:<15}", "RPS", "Mean (ms)", "P99 (ms)", "Success Rate");
        println!("{:-<10}-+-{:-<15}-+-{:-<15}-+-{:-<15}", "", "", "", "");

        for &rps in &rps_stages {
            run_stage(&http, &target, rps).await?;
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("{}", "Booking races".cyan().bold());
    println!("{}", "=".repeat(60));

    let race_session = api.create_session(&bench_session("Capacity Race", 7, Some(RACE_CAPACITY))).await?;
    created.push(race_session.id.clone());
    let won = capacity_race(&api, &race_session.id).await;
    report_race(
        &format!("{} players racing for {} seats", RACE_CONTENDERS, RACE_CAPACITY),
        won,
        RACE_CAPACITY as usize,
    );

    let dup_session = api.create_session(&bench_session("Duplicate Race", 8, None)).await?;
    created.push(dup_session.id.clone());
    let won = duplicate_race(&api, &dup_session.id).await;
    report_race(&format!("{} identical bookings", RACE_CONTENDERS), won, 1);

    println!("\n{}", "🧹 Cleaning up...".yellow());
    for id in created {
        api.delete_session(&id)
            .await
            .with_context(|| format!("failed to delete benchmark session {}", id))?;
    }

    Ok(())
}

fn bench_session(name: &str, days_ahead: i64, max_players: Option<i32>) -> UpsertSessionRequest {
    let start = Utc::now() + ChronoDuration::days(days_ahead);
    UpsertSessionRequest {
        name: Some(format!("{} +{}d", name, days_ahead)),
        start_time: Some(start),
        end_time: Some(start + ChronoDuration::hours(2)),
        arrive_by_time: Some(start - ChronoDuration::minutes(15)),
        max_players,
        ..Default::default()
    }
}

async fn capacity_race(api: &BookingClient, session_id: &str) -> usize {
    let mut set = JoinSet::new();
    for i in 0..RACE_CONTENDERS {
        let api = api.clone();
        let session_id = session_id.to_string();
        set.spawn(async move {
            api.book(&session_id, &format!("Racer {}", i), &format!("racer{}@bench.test", i)).await.is_ok()
        });
    }
    count_wins(set).await
}

async fn duplicate_race(api: &BookingClient, session_id: &str) -> usize {
    let mut set = JoinSet::new();
    for _ in 0..RACE_CONTENDERS {
        let api = api.clone();
        let session_id = session_id.to_string();
        set.spawn(async move { api.book(&session_id, "Same Player", "same@bench.test").await.is_ok() });
    }
    count_wins(set).await
}

async fn count_wins(mut set: JoinSet<bool>) -> usize {
    let mut wins = 0;
    while let Some(result) = set.join_next().await {
        if matches!(result, Ok(true)) {
            wins += 1;
        }
    }
    wins
}

fn report_race(label: &str, won: usize, expected: usize) {
    if won == expected {
        println!("{:<45} {}", label, format!("✅ {} succeeded", won).green());
    } else {
        println!("{:<45} {}", label, format!("❌ {} succeeded, expected {}", won, expected).red().bold());
    }
}

async fn run_stage(client: &Client, target: &Target, rps: u32) -> Result<()> {
    let Some(quota) = NonZeroU32::new(rps) else {
        bail!("rps must be positive");
    };
    let limiter = Arc::new(RateLimiter::direct(Quota::per_second(quota)));

    let (tx, mut rx) = mpsc::channel(50000);
    let start_time = Instant::now();
    let duration = Duration::from_secs(DURATION_SECS);

    loop {
        if start_time.elapsed() > duration {
            break;
        }

        if limiter.check().is_ok() {
            let client = client.clone();
            let url = target.url.clone();
            let tx = tx.clone();

            tokio::spawn(async move {
                let req_start = Instant::now();
                let res = client.get(&url).send().await;
                let latency = req_start.elapsed();

                let success = match res {
                    Ok(r) => r.status().is_success(),
                    Err(_) => false,
                };

                let _ = tx.send((latency, success)).await;
            });
        } else {
            tokio::task::yield_now().await;
        }
    }

    drop(tx);

    let mut histogram = Histogram::<u64>::new(3)?;
    let mut successes = 0;
    let mut total = 0;

    while let Some((latency, success)) = rx.recv().await {
        total += 1;
        if success { successes += 1; }
        histogram.record(latency.as_micros() as u64)?;
    }

    let mean_ms = histogram.mean() / 1000.0;
    let p99_ms = histogram.value_at_quantile(0.99) as f64 / 1000.0;
    let success_rate = if total > 0 { (successes as f64 / total as f64) * 100.0 } else { 0.0 };

    println!(
        "{:<10} | {:<15.2} | {:<15.2} | {:<14.1}%",
        rps,
        mean_ms,
        p99_ms,
        success_rate
    );

    tokio::time::sleep(Duration::from_millis(500)).await;
    Ok(())
}
