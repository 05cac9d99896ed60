//! Resilience helpers.
//!
//! # Design Decisions
//! - Every probe has a deadline; a timed-out probe is a connection failure
//! - Recovery retries back off exponentially with jitter
//! - Scheduled-backup failures use a fixed, configured backoff instead

pub mod backoff;
