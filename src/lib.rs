pub mod agents;
pub mod capability;
pub mod chat;
pub mod cli;
pub mod completion;
pub mod config;
pub mod doctor;
pub mod error;
pub mod profiles;
pub mod server;
pub mod telemetry;
