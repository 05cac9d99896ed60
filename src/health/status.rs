//! Health status and backend kind enums.

use serde::{Deserialize, Serialize};

/// Health classification of a backend.
///
/// Ordered by severity so that the worst status across the fleet is simply
/// the maximum: `Critical > Warning > Healthy > Unknown`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// No probe result observed yet.
    Unknown,
    /// Probe succeeded below the warn threshold.
    Healthy,
    /// Probe succeeded but latency reached the warn threshold.
    Warning,
    /// Probe failed, timed out, or latency reached the critical threshold.
    Critical,
}

impl HealthStatus {
    pub fn is_healthy(self) -> bool {
        self == HealthStatus::Healthy
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of managed backend.
///
/// Kinds carry default latency thresholds because normal latency profiles
/// differ: a graph traversal probe tolerates far more than a key-value ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Relational store (e.g. PostgreSQL).
    Relational,
    /// Graph store (e.g. Neo4j).
    Graph,
    /// Key-value store (e.g. Redis).
    KeyValue,
}

impl BackendKind {
    pub fn default_warn_ms(self) -> u64 {
        match self {
            BackendKind::Relational => 100,
            BackendKind::Graph => 250,
            BackendKind::KeyValue => 50,
        }
    }

    pub fn default_critical_ms(self) -> u64 {
        match self {
            BackendKind::Relational => 500,
            BackendKind::Graph => 1000,
            BackendKind::KeyValue => 250,
        }
    }
}
