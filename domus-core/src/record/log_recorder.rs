use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::info;

/// Writes aggregated records to the `log` facade at info level.
///
/// Keys are written in lexicographic order so that consecutive flushes line up.
pub struct LogRecorder {
    prefix: String,
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs a recorder whose lines start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            storage: RecordStorage::new(),
        }
    }

    fn format(record: &Record) -> String {
        let mut items: Vec<_> = record.iter().collect();
        items.sort_by(|a, b| a.0.cmp(b.0));
        items
            .into_iter()
            .map(|(k, v)| match v {
                RecordValue::Scalar(v) => format!("{}={:.6}", k, v),
                RecordValue::DateTime(v) => format!("{}={}", k, v),
                RecordValue::Array1(v) => format!("{}={:?}", k, v),
                RecordValue::String(v) => format!("{}={}", k, v),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}: {}", self.prefix, Self::format(&record));
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            info!("{} [{}]: {}", self.prefix, step, Self::format(&record));
        }
    }
}
