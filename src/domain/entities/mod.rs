//! Domain entities - Core bot objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;

pub use user::User;
pub use message::{Message, Content};
pub use command::{Command, CommandRegistry};
