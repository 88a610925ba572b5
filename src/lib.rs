//! Windows desktop-maintenance engine: reclaim disk space from temp, cache,
//! and log areas, and triage resource-heavy processes.
//!
//! Every public operation returns plain structured data with no embedded
//! formatting, so any front end (console, GUI, remote API) can render it.
//! Failures are data: results carry per-item error lists instead of
//! propagating platform exceptions.

pub mod admin;
pub mod catalog;
pub mod cleaner;
pub mod orchestrator;
pub mod process;
pub mod reclaim;
pub mod recycle;
pub mod space;
pub mod updates;
