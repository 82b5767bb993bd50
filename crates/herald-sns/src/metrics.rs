//! Listener metrics
//!
//! The recorder is handed in by the caller; nothing here touches the global
//! `metrics` recorder.

use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, Unit};

/// Metric names
pub mod names {
    pub const EVENT_SEND_ERRORS: &str = "event.send.errors";
}

/// Label carrying the failure kind
pub const EXCEPTION_LABEL: &str = "exception";

/// Register descriptions for the listener metrics
pub fn describe(recorder: &dyn Recorder) {
    recorder.describe_counter(
        KeyName::from_const_str(names::EVENT_SEND_ERRORS),
        Some(Unit::Count),
        "Events that could not be published to the SNS topic".into(),
    );
}

/// Count one failed publish, tagged with the failure kind
pub fn record_send_error(recorder: &dyn Recorder, kind: &str) {
    let key = Key::from_parts(
        names::EVENT_SEND_ERRORS,
        vec![Label::new(EXCEPTION_LABEL, kind.to_string())],
    );
    let metadata = Metadata::new(module_path!(), Level::ERROR, Some(module_path!()));

    recorder.register_counter(&key, &metadata).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    #[test]
    fn test_counter_tagged_by_kind() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        describe(&recorder);
        record_send_error(&recorder, "NotFoundException");
        record_send_error(&recorder, "NotFoundException");
        record_send_error(&recorder, "TimeoutError");

        let mut counts: Vec<(String, u64)> = snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter(|(key, ..)| key.key().name() == names::EVENT_SEND_ERRORS)
            .filter_map(|(key, _, _, value)| {
                let label = key
                    .key()
                    .labels()
                    .find(|l| l.key() == EXCEPTION_LABEL)?
                    .value()
                    .to_string();
                match value {
                    DebugValue::Counter(n) => Some((label, n)),
                    _ => None,
                }
            })
            .collect();
        counts.sort();

        assert_eq!(
            counts,
            vec![
                ("NotFoundException".to_string(), 2),
                ("TimeoutError".to_string(), 1)
            ]
        );
    }
}
