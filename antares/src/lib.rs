//! # **antares** 核心库
//!
//! 告警消息的解码、标识解析、落盘存储，以及与具体 Broker 无关的摄取循环。

#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod errors;
pub mod ingest;
pub mod record;
pub mod sink;

pub use domain::{Noop, Polled, Processor, RawMessage, Source};
pub use ingest::{FaultPolicy, IngestStats, Ingestor};
pub use record::{Record, decode, encode, resolve_identifier};
pub use sink::save;
