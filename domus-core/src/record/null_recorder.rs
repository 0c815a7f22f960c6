use super::{AggregateRecorder, Record, Recorder};

/// Drops every record, for runs whose values are not needed.
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    fn write(&mut self, _: Record) {}
}

impl AggregateRecorder for NullRecorder {
    fn store(&mut self, _: Record) {}

    fn flush(&mut self, _: i64) {}
}
