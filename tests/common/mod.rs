#![allow(dead_code)]

use async_trait::async_trait;
use chrono::FixedOffset;
use finview::backend::ScanBackend;
use finview::provider::PriceProvider;
use finview::types::{BackendHealth, ChartPoint, ChartSeries, ScanResponse, Signal};
use finview::{FinviewError, Result, ScanOrchestrator};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn signal(title: &str, timestamp: &str, tickers: &[&str]) -> Signal {
    Signal {
        title: title.into(),
        timestamp: timestamp.into(),
        summary: format!("{title} summary"),
        sentiment: "Bullish".into(),
        sources: vec!["https://reddit.com/r/wallstreetbets/abc".into()],
        spike_tickers: tickers.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn point(time: &str, price: f64) -> ChartPoint {
    ChartPoint { time: time.into(), price }
}

pub fn response(signals: Vec<Signal>, charts: Vec<(&str, ChartSeries)>) -> ScanResponse {
    ScanResponse {
        logs: vec!["Scan started".into(), format!("Signals returned: {}", signals.len())],
        signals,
        charts: charts.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Replays queued scan results; `None` entries fail as an unreachable backend.
/// With `gate` set, each scan waits for `release` after signalling `entered`.
#[derive(Default)]
pub struct FakeBackend {
    responses: Mutex<VecDeque<Option<ScanResponse>>>,
    pub calls: AtomicUsize,
    pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl FakeBackend {
    pub fn new(responses: Vec<Option<ScanResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn gated(responses: Vec<Option<ScanResponse>>, entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            gate: Some((entered, release)),
            ..Self::new(responses)
        }
    }
}

#[async_trait]
impl ScanBackend for FakeBackend {
    async fn scan(&self) -> Result<ScanResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .flatten()
            .ok_or_else(|| FinviewError::BackendUnavailable("connection refused".into()))
    }

    async fn health(&self) -> Result<BackendHealth> {
        Ok(BackendHealth {
            status: "ok".into(),
            time: Some("2026-10-16T00:00:00Z".into()),
        })
    }
}

/// Serves canned price series per coin id; unknown coins fail.
#[derive(Default)]
pub struct FakeProvider {
    prices: HashMap<String, Vec<(f64, f64)>>,
    pub requested: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with(prices: &[(&str, Vec<(f64, f64)>)]) -> Self {
        Self {
            prices: prices.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceProvider for FakeProvider {
    async fn market_chart(&self, coin_id: &str) -> Result<Vec<(f64, f64)>> {
        self.requested.lock().unwrap().push(coin_id.to_string());
        self.prices
            .get(coin_id)
            .cloned()
            .ok_or_else(|| FinviewError::fallback(coin_id, "HTTP status 429 Too Many Requests"))
    }
}

pub fn orchestrator(backend: Arc<FakeBackend>, provider: Arc<FakeProvider>) -> ScanOrchestrator {
    ScanOrchestrator::new(backend, provider, utc())
}
