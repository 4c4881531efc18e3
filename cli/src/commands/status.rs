use colored::*;
use hotscan_common::config::Config;
use hotscan_core::system;

use crate::terminal::print::{self, GLOBAL_KEY_WIDTH};

/// Process exit status when the hotspot is not reported as enabled.
pub const DISABLED_EXIT_STATUS: u8 = 1;

/// Maps hotspot enablement to the process exit status, so scripts can test it.
pub fn exit_status(enabled: bool) -> u8 {
    if enabled { 0 } else { DISABLED_EXIT_STATUS }
}

pub fn status(cfg: &Config) -> bool {
    let enabled: bool = system::is_hotspot_enabled(system::platform_introspector().as_ref());

    if cfg.quiet > 1 {
        print::print(if enabled { "enabled" } else { "disabled" });
        return enabled;
    }

    let value: ColoredString = if enabled {
        "enabled".green().bold()
    } else {
        "disabled".red().bold()
    };
    GLOBAL_KEY_WIDTH.set("Hotspot".len());
    print::aligned_line("Hotspot", value);
    enabled
}
