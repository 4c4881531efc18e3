//! Active sweep over the hotspot subnet.
//!
//! Every candidate address gets its own task. A semaphore caps the probes in
//! flight, so a full `/24` finishes in a few probe timeouts instead of 254.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use hotscan_common::{device::DeviceRecord, error::DiscoveryError, network::range::SweepRange};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, warn};

use super::ProgressCallback;
use super::resolver::{HostnameResolver, resolve_host_name};
use crate::network::Prober;

pub struct SweepScanner {
    prober: Arc<dyn Prober>,
    resolver: Arc<dyn HostnameResolver>,
    max_concurrent: usize,
    on_device_found: Option<ProgressCallback>,
}

impl SweepScanner {
    pub fn new(
        prober: Arc<dyn Prober>,
        resolver: Arc<dyn HostnameResolver>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            prober,
            resolver,
            max_concurrent: max_concurrent.max(1),
            on_device_found: None,
        }
    }

    pub fn with_progress(mut self, on_device_found: Option<ProgressCallback>) -> Self {
        self.on_device_found = on_device_found;
        self
    }

    /// Sweeps `prefix.start` up to, but excluding, `prefix.end_exclusive`.
    pub async fn sweep_subnet(
        &self,
        prefix: &str,
        start: u16,
        end_exclusive: u16,
    ) -> Result<Vec<DeviceRecord>, DiscoveryError> {
        let range: SweepRange = SweepRange::new(prefix, start, end_exclusive)?;
        Ok(self.sweep(&range).await)
    }

    /// Returns the hosts that answered, in address order. Silent hosts are
    /// left out without a trace in the result.
    pub async fn sweep(&self, range: &SweepRange) -> Vec<DeviceRecord> {
        debug!("Sweeping {}.[{} hosts]", range.prefix(), range.len());

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let found: Arc<Mutex<Vec<(Ipv4Addr, DeviceRecord)>>> = Arc::new(Mutex::new(Vec::new()));
        let found_count = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(range.len());

        for ip in range.to_iter() {
            let semaphore = Arc::clone(&semaphore);
            let found = Arc::clone(&found);
            let found_count = Arc::clone(&found_count);
            let prober = Arc::clone(&self.prober);
            let resolver = Arc::clone(&self.resolver);
            let on_device_found = self.on_device_found.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        warn!("Probe semaphore closed for {ip}: {e}");
                        return;
                    }
                };

                if let Err(e) = prober.probe(ip).await {
                    debug!("{e}");
                    return;
                }

                let addr: String = ip.to_string();
                let host_name: String = resolve_host_name(resolver.as_ref(), &addr).await;
                found.lock().await.push((ip, DeviceRecord::new(addr, host_name)));

                let count: usize = found_count.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = on_device_found {
                    cb(count);
                }
            });

            handles.push(handle);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Probe task failed: {e}");
            }
        }

        let mut found: Vec<(Ipv4Addr, DeviceRecord)> = std::mem::take(&mut *found.lock().await);
        found.sort_by_key(|(ip, _)| *ip);

        debug!("{} of {} hosts answered", found.len(), range.len());
        found.into_iter().map(|(_, record)| record).collect()
    }
}
