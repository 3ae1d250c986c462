// =================================================================
// service.rs - Producer Loops & Orchestration
// =================================================================

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::SimulationConfig;
use crate::sim::{PositionGenerator, PositionSide};
use crate::sink::{InsertStatement, Sink, SinkError};

/// Runs one producer loop per configured symbol against a shared sink.
///
/// Producers share nothing but the sink handle: no ordering between
/// symbols, no retry of dropped records, no state across rounds.
pub struct SimulationService {
    sink: Arc<dyn Sink>,
    symbols: Vec<String>,
    simulation: SimulationConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl SimulationService {
    pub fn new(sink: Arc<dyn Sink>, symbols: Vec<String>, simulation: SimulationConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            sink,
            symbols,
            simulation,
            shutdown_tx,
        }
    }

    /// Handle used to request a stop (typically wired to Ctrl+C)
    pub fn get_shutdown_tx(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Spawn one producer task per symbol, staggered to avoid a
    /// connection burst, and wait until every producer has stopped.
    pub async fn start(&self) -> anyhow::Result<()> {
        if self.symbols.is_empty() {
            anyhow::bail!("No symbols configured");
        }

        // Subscribe every producer up front so a shutdown fired during
        // the startup stagger is never missed by late spawns.
        let mut pending: Vec<(String, broadcast::Receiver<()>)> = self
            .symbols
            .iter()
            .map(|symbol| (symbol.clone(), self.shutdown_tx.subscribe()))
            .collect();

        let mut stagger_rx = self.shutdown_tx.subscribe();
        let mut handles = Vec::with_capacity(pending.len());

        for (idx, (symbol, shutdown_rx)) in pending.drain(..).enumerate() {
            if idx > 0 {
                tokio::select! {
                    _ = sleep(self.simulation.startup_stagger()) => {}
                    _ = stagger_rx.recv() => {
                        info!("Shutdown requested during startup stagger");
                        break;
                    }
                }
            }

            let sink = Arc::clone(&self.sink);
            let config = self.simulation.clone();
            handles.push(tokio::spawn(run_producer(symbol, sink, config, shutdown_rx)));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Producer task ended abnormally: {}", e);
            }
        }

        Ok(())
    }
}

/// One instrument's generate/encode/submit loop.
///
/// A round is `positions_per_round` buy/sell pairs, paced by
/// `record_delay` between records and `round_delay` between rounds.
/// Transport failures pause the loop for `recovery_delay`; the failed
/// record is dropped, not retried.
async fn run_producer(
    symbol: String,
    sink: Arc<dyn Sink>,
    config: SimulationConfig,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let generator = PositionGenerator::new(symbol.as_str());
    info!("[{}] producer started", symbol);

    'running: loop {
        for _ in 0..config.positions_per_round {
            for side in [PositionSide::Buy, PositionSide::Sell] {
                if shutdown_rx.try_recv().is_ok() {
                    break 'running;
                }

                let position = generator.generate(side);
                let statement = InsertStatement::now(&position);

                match sink.submit(&statement.to_sql()).await {
                    Ok(()) => {
                        info!(
                            "[{}] position {} saved | profit {:.2}",
                            symbol, position.ticket, position.profit
                        );
                    }
                    Err(SinkError::Unreachable(cause)) => {
                        warn!(
                            "[{}] sink unreachable, pausing {:?}: {}",
                            symbol,
                            config.recovery_delay(),
                            cause
                        );
                        if !sleep_or_shutdown(config.recovery_delay(), &mut shutdown_rx).await {
                            break 'running;
                        }
                    }
                    Err(e) => {
                        // Schema/data problem; a pause would not help
                        error!("[{}] dropping position {}: {}", symbol, position.ticket, e);
                    }
                }

                if !sleep_or_shutdown(config.record_delay(), &mut shutdown_rx).await {
                    break 'running;
                }
            }
        }

        if !sleep_or_shutdown(config.round_delay(), &mut shutdown_rx).await {
            break;
        }
    }

    info!("[{}] producer stopped", symbol);
}

/// Sleep that doubles as a cancellation point. Returns false when the
/// shutdown signal arrived during the pause.
async fn sleep_or_shutdown(delay: Duration, shutdown_rx: &mut broadcast::Receiver<()>) -> bool {
    tokio::select! {
        _ = sleep(delay) => true,
        _ = shutdown_rx.recv() => false,
    }
}
