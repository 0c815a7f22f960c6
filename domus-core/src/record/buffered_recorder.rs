use super::{Record, Recorder};

/// Keeps every written record in memory.
///
/// Used to collect traces of a run, e.g. the actions of an episode or the
/// iterations of a configuration search, for later inspection.
#[derive(Default)]
pub struct BufferedRecorder {
    records: Vec<Record>,
}

impl BufferedRecorder {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.records.push(record);
    }
}
