//! Background [`Task`]s definitions.

pub mod evict_stale_flows;

pub use common::Handler as Task;

pub use self::evict_stale_flows::EvictStaleFlows;
