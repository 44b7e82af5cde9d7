//! Application layer - Use cases and bot logic
//! 
//! This layer contains:
//! - Services: Command registration and execution
//! - Errors: Domain-specific errors
//! - Messaging: Message parsing and dispatching

pub mod errors;
pub mod services;
pub mod messaging;
