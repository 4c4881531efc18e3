use std::{cell::Cell, fmt::Display};

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

/// Events with this target are printed without a status symbol.
pub const PRINT_TARGET: &str = "hotscan::print";

thread_local! {
    pub static GLOBAL_KEY_WIDTH: Cell<usize> = const { Cell::new(0) }
}

#[macro_export]
macro_rules! hprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: String = format!(
        "{}{}{}",
        "─".repeat(left).color(colors::SEPARATOR),
        formatted.color(colors::PRIMARY),
        "─".repeat(right).color(colors::SEPARATOR)
    );

    print(&line);
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR);
    print(&format!("{sep}"));
}

pub fn centerln(msg: &str) {
    let width: usize = console::measure_text_width(msg);
    let pad: usize = TOTAL_WIDTH.saturating_sub(width) / 2;
    print(&format!("{}{msg}", " ".repeat(pad)));
}

pub fn aligned_line<V: Display>(key: &str, value: V) {
    let dots: String = ".".repeat((GLOBAL_KEY_WIDTH.get() + 1).saturating_sub(key.len()));
    let colon: String = format!("{}{}", dots.color(colors::SEPARATOR), ":".color(colors::SEPARATOR));
    print(&format!("{}{colon} {value}", key.color(colors::ACCENT)));
}

pub fn tree_head(idx: usize, name: &ColoredString) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    print(&format!("{} {name}", idx_str.color(colors::SEPARATOR)));
}

/// Prints `details` as the single level below a [`tree_head`].
pub fn as_tree_one_level(details: Vec<(String, ColoredString)>) {
    let key_width: usize = details.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    for (i, (key, value)) in details.iter().enumerate() {
        let branch: &str = if i + 1 == details.len() { "└─" } else { "├─" };
        let dots: String = ".".repeat(key_width + 1 - key.len());
        print(&format!(
            " {} {}{}{} {value}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
        ));
    }
}

pub fn no_results() {
    print_status("No devices answered. Is anybody connected to the hotspot?");
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    print(&format!("{prefix} {}", msg.as_ref().color(colors::TEXT_DEFAULT)));
}
