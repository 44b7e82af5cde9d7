//! Domain layer - Core bot objects with no external dependencies
//! 
//! This layer contains:
//! - Entities: User, Message, Command
//! - Traits: Abstractions for platform adapters (Bot)

pub mod entities;
pub mod traits;
