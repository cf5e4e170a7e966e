use crate::backend::ScanBackend;
use crate::charts::{fallback_series, ChartStore};
use crate::deduplication::SignalDeduplicator;
use crate::error::{FinviewError, Result};
use crate::provider::PriceProvider;
use crate::resolver;
use crate::types::{BackendHealth, CycleReport, Signal};
use crate::view::{DashboardView, SignalCard};
use chrono::{FixedOffset, Utc};
use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

#[derive(Default)]
struct CycleState {
    logs: Vec<String>,
    signals: Vec<Signal>,
    charts: ChartStore,
    last_error: Option<String>,
    scanned_at: Option<i64>,
}

/// Clears the scanning flag however the cycle ends.
struct ScanningGuard<'a>(&'a AtomicBool);

impl Drop for ScanningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs scan cycles: backend scan, dedup, backend charts, fallback charts.
///
/// Owns the session's seen-signal set and the chart store. Only one cycle
/// runs at a time; a scan requested while another is in flight is rejected
/// with [`FinviewError::ScanInProgress`] and leaves all state untouched.
pub struct ScanOrchestrator {
    backend: Arc<dyn ScanBackend>,
    provider: Arc<dyn PriceProvider>,
    chart_offset: FixedOffset,
    deduplicator: SignalDeduplicator,
    scanning: AtomicBool,
    state: RwLock<CycleState>,
    cycles_completed: RwLock<u64>,
    updates: broadcast::Sender<DashboardView>,
}

/// Distinct spike tickers across `signals`, in first-seen order.
pub fn distinct_spike_tickers(signals: &[Signal]) -> Vec<String> {
    let mut seen = HashSet::new();
    signals
        .iter()
        .flat_map(|s| s.spike_tickers.iter())
        .filter(|t| seen.insert(*t))
        .cloned()
        .collect()
}

impl ScanOrchestrator {
    pub fn new(backend: Arc<dyn ScanBackend>, provider: Arc<dyn PriceProvider>, chart_offset: FixedOffset) -> Self {
        let (updates, _) = broadcast::channel(16);
        Self {
            backend,
            provider,
            chart_offset,
            deduplicator: SignalDeduplicator::new(),
            scanning: AtomicBool::new(false),
            state: RwLock::new(CycleState::default()),
            cycles_completed: RwLock::new(0),
            updates,
        }
    }

    pub async fn scan(&self) -> Result<CycleReport> {
        if self
            .scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("[Orchestrator] Scan requested while scanning, ignored");
            return Err(FinviewError::ScanInProgress);
        }

        let result = {
            let _guard = ScanningGuard(&self.scanning);
            self.run_cycle().await
        };
        self.publish().await;
        result
    }

    async fn run_cycle(&self) -> Result<CycleReport> {
        {
            let mut state = self.state.write().await;
            state.logs.clear();
            state.signals.clear();
            state.charts.reset();
            state.last_error = None;
        }
        self.publish().await;
        info!("[Orchestrator] Scan started");

        let response = match self.backend.scan().await {
            Ok(response) => response,
            Err(e) => {
                warn!("[Orchestrator] Scan failed: {}", e);
                let mut state = self.state.write().await;
                state.last_error = Some(e.to_string());
                state.scanned_at = Some(Utc::now().timestamp_millis());
                return Err(e);
            }
        };

        let fresh = self.deduplicator.filter_new(&response.signals).await;
        let mut report = CycleReport {
            logs: response.logs.len(),
            new_signals: fresh.len(),
            backend_charts: response.charts.values().filter(|s| !s.is_empty()).count(),
            ..CycleReport::default()
        };
        info!(
            "[Orchestrator] {} of {} signal(s) are new",
            fresh.len(),
            response.signals.len()
        );

        let tickers = distinct_spike_tickers(&fresh);
        let mut pending = Vec::new();
        {
            let mut state = self.state.write().await;
            state.logs = response.logs;
            state.signals = fresh;
            state.charts.adopt_backend(response.charts);

            for ticker in tickers {
                if state.charts.has_data(&ticker) {
                    continue;
                }
                match resolver::resolve(&ticker) {
                    Some(coin) => pending.push((ticker, coin)),
                    None => {
                        debug!("[Orchestrator] No chart source for {}", ticker);
                        report.unsupported_tickers.push(ticker);
                    }
                }
            }
        }

        let fetches = pending.into_iter().map(|(ticker, coin)| async move {
            let series = self
                .provider
                .market_chart(coin)
                .await
                .and_then(|prices| fallback_series(coin, &prices, &self.chart_offset));
            (ticker, series)
        });

        for (ticker, series) in join_all(fetches).await {
            match series {
                Ok(series) => {
                    if self.state.write().await.charts.adopt_fallback(&ticker, series) {
                        report.fallback_charts.push(ticker);
                    }
                }
                Err(e) => {
                    warn!("[Orchestrator] Chart error for {}: {}", ticker, e);
                    report.failed_tickers.push(ticker);
                }
            }
        }

        self.state.write().await.scanned_at = Some(Utc::now().timestamp_millis());
        *self.cycles_completed.write().await += 1;

        info!(
            "[Orchestrator] Scan finished: {} new signal(s), {} backend chart(s), {} fallback chart(s), {} failed",
            report.new_signals,
            report.backend_charts,
            report.fallback_charts.len(),
            report.failed_tickers.len()
        );
        Ok(report)
    }

    async fn publish(&self) {
        if self.updates.receiver_count() == 0 {
            return;
        }
        let _ = self.updates.send(self.view().await);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardView> {
        self.updates.subscribe()
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    pub async fn view(&self) -> DashboardView {
        let state = self.state.read().await;
        DashboardView {
            loading: self.is_scanning(),
            logs: state.logs.clone(),
            signals: state
                .signals
                .iter()
                .map(|s| SignalCard::build(s, &state.charts))
                .collect(),
            last_error: state.last_error.clone(),
            scanned_at: state.scanned_at,
        }
    }

    pub async fn seen_count(&self) -> usize {
        self.deduplicator.seen_count().await
    }

    pub async fn cycles_completed(&self) -> u64 {
        *self.cycles_completed.read().await
    }

    pub async fn backend_health(&self) -> Result<BackendHealth> {
        self.backend.health().await
    }
}
