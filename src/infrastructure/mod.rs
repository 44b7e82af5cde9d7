//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Liveness: HTTP endpoint polled by the hosting platform
//! - Adapters: Platform integrations (Discord, console)

pub mod config;
pub mod liveness;
pub mod adapters;
