pub mod discover;
pub mod status;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hotscan")]
#[command(about = "Lists the devices connected to this machine's hotspot.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Skip reverse DNS lookups
    #[arg(long, global = true)]
    pub no_dns: bool,

    /// Less decoration, repeat for less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// More logging, repeat for more
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover devices connected to the hotspot
    #[command(alias = "d")]
    Discover(DiscoverArgs),
    /// Report whether the hotspot is enabled
    #[command(alias = "s")]
    Status,
}

#[derive(Args, Debug, Default)]
pub struct DiscoverArgs {
    /// Subnet prefix to sweep, e.g. 192.168.43
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Neighbor table to read instead of /proc/net/arp
    #[arg(short, long)]
    pub table: Option<PathBuf>,

    /// Treat the neighbor table as restricted and sweep the subnet
    #[arg(long)]
    pub sweep: bool,

    /// Per-host probe timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
