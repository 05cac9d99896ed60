//! Reference adapter implementations.
//!
//! # Design Decisions
//! - The TCP probe is protocol-agnostic: a connect round-trip works for a
//!   relational, graph, or key-value backend alike
//! - Tool invocation for dumps stays here at the crate edge; the core only
//!   sees the `DumpAdapter` trait

pub mod command;
pub mod tcp;

pub use command::CommandDumpAdapter;
pub use tcp::TcpProbeAdapter;
