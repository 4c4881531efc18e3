use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use hotscan_common::{
    config::Config,
    device::DeviceRecord,
    environment::{Environment, PlatformCapabilities},
    network::range::parse_prefix,
};
use hotscan_core::{discovery::DiscoveryService, system};
use tracing::{Instrument, Span, info, warn};

use crate::commands::DiscoverArgs;
use crate::hprint;
use crate::terminal::{format, print, spinner};

pub async fn discover(args: DiscoverArgs, cfg: &Config) -> anyhow::Result<()> {
    if !system::is_hotspot_enabled(system::platform_introspector().as_ref()) {
        warn!("Hotspot is not reported as enabled, the result may be empty");
    }

    let env: Environment = environment_from(args)?;
    info!("Looking for devices via {}", env.strategy());

    let span: Span = spinner::discovery_span();
    let progress_span: Span = span.clone();
    let service = DiscoveryService::for_host(cfg)
        .with_progress(move |count| spinner::report_discovery_progress(&progress_span, count));

    let start_time: Instant = Instant::now();
    let records: Vec<DeviceRecord> = service.perform_discovery(env).instrument(span).await;

    discovery_ends(&records, start_time.elapsed(), cfg);
    Ok(())
}

fn environment_from(args: DiscoverArgs) -> anyhow::Result<Environment> {
    let mut env: Environment = Environment::detect();

    if let Some(table) = args.table {
        env = env.with_neighbor_table(table);
    }
    if let Some(prefix) = args.prefix {
        parse_prefix(&prefix).with_context(|| format!("--prefix {prefix}"))?;
        env = env.with_subnet_prefix(prefix);
    }
    if args.sweep {
        env = env.with_capabilities(PlatformCapabilities {
            neighbor_table_readable: false,
        });
    }
    Ok(env)
}

/// Folds the `discover` flags into `cfg`.
pub fn apply_overrides(args: &DiscoverArgs, cfg: &mut Config) {
    if let Some(ms) = args.timeout {
        cfg.probe_timeout = Duration::from_millis(ms);
        cfg.dns_timeout = Duration::from_millis(ms);
    }
}

fn discovery_ends(records: &[DeviceRecord], total_time: Duration, cfg: &Config) {
    if records.is_empty() {
        print::header("zero devices detected", cfg.quiet);
        print::no_results();
        return;
    }

    if cfg.quiet > 0 {
        hprint!();
    }

    print::header("connected devices", cfg.quiet);
    print_records(records, cfg);
    print_summary(records.len(), total_time, cfg);
}

fn print_records(records: &[DeviceRecord], cfg: &Config) {
    for (idx, record) in records.iter().enumerate() {
        match cfg.quiet {
            2.. => print::print(record.ip()),
            _ => {
                print::tree_head(idx, &format::host_name(record));
                print::as_tree_one_level(format::record_to_details(record));
                if idx + 1 != records.len() {
                    hprint!();
                }
            }
        }
    }
}

fn print_summary(count: usize, total_time: Duration, cfg: &Config) {
    let found: ColoredString = format!("{count} devices").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Discovery complete: {found} identified in {total_time}");

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        1 => {
            hprint!();
            print::print_status(output);
        }
        _ => {}
    }
}
