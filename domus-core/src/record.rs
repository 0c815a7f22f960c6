//! Types and traits for recording values produced during training, evaluation
//! and configuration search.
//!
//! * [`Record`] - A container of key-value pairs of various data types
//! * [`RecordValue`] - The types of values that can be stored
//! * [`Recorder`] - Writes records to some output
//! * [`AggregateRecorder`] - Stores records and flushes aggregated values
//! * [`RecordStorage`] - Aggregation of stored records
//! * [`BufferedRecorder`] - Keeps records in memory, used for action traces
//! * [`LogRecorder`] - Flushes aggregated records to the `log` facade
//! * [`NullRecorder`] - Discards all records
//!
//! # Basic Usage
//!
//! ```rust
//! use domus_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("reward", RecordValue::Scalar(-0.25));
//! record.insert("act_phys", RecordValue::Array1(vec![179.0, 0.0, 6000.0]));
//! assert_eq!(record.get_scalar("reward").unwrap(), -0.25);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
