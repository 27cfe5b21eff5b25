use super::{EventSink, RecordError, RecordedEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Keeps events in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<RecordedEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedEvent>> {
        // A panic mid-push leaves the Vec intact.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for MemorySink {
    fn write(&self, event: &RecordedEvent) -> Result<(), RecordError> {
        self.lock().push(event.clone());
        Ok(())
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::debug!("recording events to {}", path.display());
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&self) -> MutexGuard<'_, BufWriter<File>> {
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventSink for JsonLinesSink {
    fn write(&self, event: &RecordedEvent) -> Result<(), RecordError> {
        let line = serde_json::to_string(event)?;
        let mut writer = self.writer();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> Result<(), RecordError> {
        self.writer().flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{LeadRecord, LeadSubmission, Recorder};

    fn lead(company: &str) -> RecordedEvent {
        let submission = LeadSubmission {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            phone: Some("555-010-2030".to_string()),
            company: company.to_string(),
            message: Some("Interested in a demo".to_string()),
            consent: true,
            source: "calculator".to_string(),
            roi_data: None,
        };
        RecordedEvent::Lead(LeadRecord::accept(submission, None).unwrap())
    }

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let clone = sink.clone();
        clone.write(&lead("Navy")).unwrap();
        assert_eq!(sink.len(), 1);
        assert!(!sink.is_empty());
    }

    #[test]
    fn test_json_lines_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let recorder = Recorder::spawn(JsonLinesSink::open(&path).unwrap()).unwrap();
        recorder.record(lead("Navy"));
        recorder.shutdown().unwrap();

        let recorder = Recorder::spawn(JsonLinesSink::open(&path).unwrap()).unwrap();
        recorder.record(lead("Remington Rand"));
        recorder.shutdown().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: RecordedEvent = serde_json::from_str(lines[1]).unwrap();
        match second {
            RecordedEvent::Lead(lead) => assert_eq!(lead.submission.company, "Remington Rand"),
            other => panic!("unexpected event {}", other.kind()),
        }
    }
}
