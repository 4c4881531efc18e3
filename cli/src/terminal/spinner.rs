use colored::*;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Span whose progress bar renders as the discovery spinner while entered.
pub fn discovery_span() -> Span {
    let span: Span = info_span!("discovery");

    let style: ProgressStyle = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS);

    span.pb_set_style(&style);
    span.pb_set_message("Looking for devices...");
    span
}

pub fn report_discovery_progress(span: &Span, count: usize) {
    span.pb_set_message(&format!(
        "Identified {} devices so far...",
        count.to_string().green().bold()
    ));
}
