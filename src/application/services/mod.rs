//! Application services - Command orchestration

pub mod command_service;

pub use command_service::CommandService;
