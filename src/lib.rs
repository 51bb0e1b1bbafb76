//! rpcwatch - RPC provider health monitor
//!
//! Client-side polling of an RPC provider monitoring backend: a keyed,
//! atomically replaced snapshot of every provider's latest health, forced
//! probes, and the summary values (best provider, status badges) derived
//! from it.

pub mod cli;
pub mod client;
pub mod config;
pub mod health;
pub mod logging;
