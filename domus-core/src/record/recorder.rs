use super::Record;

/// Sink of individual records, such as one line per search iteration.
pub trait Recorder {
    /// Hands `record` over to the sink.
    fn write(&mut self, record: Record);
}

/// Sink collecting records and emitting a summary of them on demand.
pub trait AggregateRecorder {
    /// Keeps `record` until the next [`flush`](AggregateRecorder::flush).
    fn store(&mut self, record: Record);

    /// Emits the summary of the kept records, labelled with `step`, and
    /// forgets them.
    fn flush(&mut self, step: i64);
}
