//! # Device Discovery Service
//!
//! Implements the "who is on my hotspot" use case.
//!
//! The service decides once per call whether to read the neighbor table or
//! to sweep the subnet, runs that strategy on a worker task and delivers the
//! aggregated records exactly once, even when nothing was found.

use std::sync::Arc;

use hotscan_common::{
    config::Config,
    device::{self, DeviceRecord},
    environment::Environment,
    network::range::SweepRange,
    strategy::{DiscoveryState, DiscoveryStrategy},
};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use crate::network::{Prober, ReachabilityProber};
use crate::scanner::{
    ProgressCallback, neighbor,
    resolver::{self, HostnameResolver},
    sweep::SweepScanner,
};

/// Application service for device discovery.
///
/// Platform services are injected rather than looked up, so every
/// collaborator can be replaced in tests.
#[derive(Clone)]
pub struct DiscoveryService {
    resolver: Arc<dyn HostnameResolver>,
    prober: Arc<dyn Prober>,
    sweep_start: u16,
    sweep_end: u16,
    max_concurrent_probes: usize,
    on_device_found: Option<ProgressCallback>,
}

impl DiscoveryService {
    pub fn new(
        resolver: Arc<dyn HostnameResolver>,
        prober: Arc<dyn Prober>,
        cfg: &Config,
    ) -> Self {
        Self {
            resolver,
            prober,
            sweep_start: cfg.sweep_start,
            sweep_end: cfg.sweep_end,
            max_concurrent_probes: cfg.max_concurrent_probes,
            on_device_found: None,
        }
    }

    /// Wires the OS resolver and the best available prober.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn for_host(cfg: &Config) -> Self {
        let prober: Arc<dyn Prober> = Arc::new(ReachabilityProber::detect(cfg.probe_timeout));
        Self::new(resolver::resolver_for(cfg), prober, cfg)
    }

    pub fn with_progress(mut self, on_device_found: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_device_found = Some(Arc::new(on_device_found));
        self
    }

    /// Starts a discovery run on a worker task and returns immediately.
    ///
    /// Overlapping calls are independent: each owns its own result list.
    /// Must be called from within a Tokio runtime.
    pub fn discover_devices(&self, env: Environment) -> DiscoveryHandle {
        let strategy: DiscoveryStrategy = env.strategy();
        let (state_tx, state_rx) = watch::channel(DiscoveryState::Idle);
        let (result_tx, result_rx) = oneshot::channel();
        let worker: DiscoveryService = self.clone();

        tokio::spawn(async move {
            state_tx.send_replace(DiscoveryState::Running);

            let records: Vec<DeviceRecord> = worker.run(strategy, &env).await;
            let records: Vec<DeviceRecord> = device::collapse_duplicates(records);
            info!("Discovery via {strategy} found {} devices", records.len());

            state_tx.send_replace(DiscoveryState::Completed);
            if result_tx.send(records).is_err() {
                debug!("Discovery handle dropped before completion");
            }
        });

        DiscoveryHandle {
            strategy,
            state: state_rx,
            result: result_rx,
        }
    }

    /// Callback flavour of [`discover_devices`](Self::discover_devices).
    /// `on_complete` runs exactly once, on a worker task.
    pub fn discover_devices_with<F>(&self, env: Environment, on_complete: F)
    where
        F: FnOnce(Vec<DeviceRecord>) + Send + 'static,
    {
        let handle: DiscoveryHandle = self.discover_devices(env);
        tokio::spawn(async move {
            on_complete(handle.wait().await);
        });
    }

    /// Runs a discovery and waits for its records.
    pub async fn perform_discovery(&self, env: Environment) -> Vec<DeviceRecord> {
        self.discover_devices(env).wait().await
    }

    async fn run(&self, strategy: DiscoveryStrategy, env: &Environment) -> Vec<DeviceRecord> {
        match strategy {
            DiscoveryStrategy::PassiveTable => self.read_table(env).await,
            DiscoveryStrategy::ActiveSweep => self.sweep(env).await,
        }
    }

    /// An unreadable table yields an empty result. There is no retry with a
    /// sweep: the capability check already said the table was the way to go.
    async fn read_table(&self, env: &Environment) -> Vec<DeviceRecord> {
        let resolver: Arc<dyn HostnameResolver> = Arc::clone(&self.resolver);

        match neighbor::try_read_neighbor_table(
            &env.neighbor_table,
            resolver,
            self.max_concurrent_probes,
        )
        .await
        {
            Ok(records) => {
                if let Some(cb) = &self.on_device_found {
                    cb(records.len());
                }
                records
            }
            Err(e) => {
                warn!("{e}");
                Vec::new()
            }
        }
    }

    async fn sweep(&self, env: &Environment) -> Vec<DeviceRecord> {
        let range: SweepRange =
            match SweepRange::new(&env.subnet_prefix, self.sweep_start, self.sweep_end) {
                Ok(range) => range,
                Err(e) => {
                    warn!("{e}");
                    return Vec::new();
                }
            };

        SweepScanner::new(
            Arc::clone(&self.prober),
            Arc::clone(&self.resolver),
            self.max_concurrent_probes,
        )
        .with_progress(self.on_device_found.clone())
        .sweep(&range)
        .await
    }
}

/// One in-flight discovery. Consumed by [`wait`](Self::wait), so the records
/// can only be taken once.
pub struct DiscoveryHandle {
    strategy: DiscoveryStrategy,
    state: watch::Receiver<DiscoveryState>,
    result: oneshot::Receiver<Vec<DeviceRecord>>,
}

impl DiscoveryHandle {
    pub fn strategy(&self) -> DiscoveryStrategy {
        self.strategy
    }

    pub fn state(&self) -> DiscoveryState {
        match self.state.has_changed() {
            // the worker is gone, with or without a result
            Err(_) => DiscoveryState::Completed,
            Ok(_) => *self.state.borrow(),
        }
    }

    /// Resolves to the records of this run. A worker that died without
    /// reporting yields an empty list.
    pub async fn wait(self) -> Vec<DeviceRecord> {
        self.result.await.unwrap_or_else(|_| {
            warn!("Discovery worker stopped without delivering results");
            Vec::new()
        })
    }
}
