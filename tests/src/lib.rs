//! Cross-crate scenarios for the discovery core, run against fakes.

#[cfg(test)]
mod discovery;
#[cfg(test)]
mod utils;
