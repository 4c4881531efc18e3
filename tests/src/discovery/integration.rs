use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use hotscan_common::{
    device::{DeviceRecord, UNKNOWN_HOSTNAME},
    environment::{Environment, PlatformCapabilities},
    strategy::{DiscoveryState, DiscoveryStrategy},
};
use tokio::sync::oneshot;

use crate::utils::{FakeNetwork, neighbor_table, service};

fn restricted(prefix: &str) -> Environment {
    Environment::default()
        .with_capabilities(PlatformCapabilities {
            neighbor_table_readable: false,
        })
        .with_subnet_prefix(prefix)
}

/// A readable table is the only source consulted, and every column lands
/// where it belongs.
#[tokio::test]
async fn passive_table_yields_one_record() -> anyhow::Result<()> {
    let table = neighbor_table(&[
        "IP flags HWType HWAddress Mask Device",
        "192.168.43.5 0x1 0x2 aa:bb:cc:dd:ee:ff * wlan0",
    ])?;
    let network = FakeNetwork::silent();

    let env = Environment::default().with_neighbor_table(table.path());
    let handle = service(Arc::clone(&network)).discover_devices(env);
    assert_eq!(handle.strategy(), DiscoveryStrategy::PassiveTable);

    let records: Vec<DeviceRecord> = handle.wait().await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.ip(), "192.168.43.5");
    assert_eq!(record.mac(), Some("aa:bb:cc:dd:ee:ff"));
    assert_eq!(record.flags(), Some("0x2"));
    assert_eq!(record.interface_name(), Some("wlan0"));
    assert_eq!(record.host_name(), UNKNOWN_HOSTNAME);
    assert_eq!(network.probe_count(), 0, "passive discovery must not probe");
    Ok(())
}

#[tokio::test]
async fn sweep_finds_the_single_reachable_host() {
    let network = FakeNetwork::with_hosts(&[Ipv4Addr::new(192, 168, 43, 10)]);

    let handle = service(Arc::clone(&network)).discover_devices(restricted("192.168.43"));
    assert_eq!(handle.strategy(), DiscoveryStrategy::ActiveSweep);

    let records = handle.wait().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip(), "192.168.43.10");
    assert_eq!(records[0].mac(), None);
    assert_eq!(network.probe_count(), 254);
}

#[tokio::test]
async fn silent_sweep_delivers_empty_list_once() {
    let deliveries: Arc<Mutex<Vec<Vec<DeviceRecord>>>> = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = oneshot::channel();

    let sink = Arc::clone(&deliveries);
    service(FakeNetwork::silent()).discover_devices_with(restricted("192.168.43"), move |records| {
        sink.lock().unwrap().push(records);
        let _ = done_tx.send(());
    });

    done_rx.await.expect("completion callback never fired");
    tokio::task::yield_now().await;

    let deliveries = deliveries.lock().unwrap();
    assert_eq!(deliveries.len(), 1);
    assert!(deliveries[0].is_empty());
}

#[tokio::test]
async fn sweep_never_leaves_the_hotspot_subnet() {
    let everything: Vec<Ipv4Addr> = (0..=255)
        .map(|d| Ipv4Addr::new(192, 168, 43, d))
        .chain([Ipv4Addr::new(192, 168, 44, 1)])
        .collect();

    let records = service(FakeNetwork::with_hosts(&everything))
        .perform_discovery(restricted("192.168.43"))
        .await;

    assert!(records.len() <= 254);
    for record in &records {
        let suffix: u16 = record
            .ip()
            .strip_prefix("192.168.43.")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| panic!("{} is outside the sweep", record.ip()));
        assert!((1..255).contains(&suffix));
    }
}

#[tokio::test]
async fn unreadable_table_does_not_fall_back_to_sweep() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let network = FakeNetwork::with_hosts(&[Ipv4Addr::new(192, 168, 43, 10)]);
    let env = Environment::new(
        PlatformCapabilities {
            neighbor_table_readable: true,
        },
        dir.path().join("missing"),
        "192.168.43",
    );

    let records = service(Arc::clone(&network)).perform_discovery(env).await;

    assert!(records.is_empty());
    assert_eq!(network.probe_count(), 0);
    Ok(())
}

#[tokio::test]
async fn malformed_rows_are_skipped() -> anyhow::Result<()> {
    let table = neighbor_table(&[
        "IP address HW type Flags HW address Mask Device",
        "garbage",
        "192.168.43.8 0x1 0x2 11:22:33:44:55:66 *",
        "",
        "192.168.43.9   0x1   0x2   11:22:33:44:55:77   *   wlan0",
    ])?;

    let records = service(FakeNetwork::silent())
        .perform_discovery(Environment::default().with_neighbor_table(table.path()))
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ip(), "192.168.43.9");
    Ok(())
}

#[tokio::test]
async fn handle_reports_completion() {
    let handle = service(FakeNetwork::silent()).discover_devices(restricted("10.0.0"));

    let records = handle.wait().await;
    assert!(records.is_empty());

    // a fresh handle whose worker already finished
    let handle = service(FakeNetwork::silent()).discover_devices(restricted("10.0.0"));
    while handle.state() != DiscoveryState::Completed {
        tokio::task::yield_now().await;
    }
    assert!(handle.wait().await.is_empty());
}
