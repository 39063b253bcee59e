//! # **antares** 的 Kafka 实现
//!
//!

pub mod app;
pub mod config;
pub mod errors;
pub mod session;
pub mod ssl;

pub use app::App;
pub use session::KafkaSession;
