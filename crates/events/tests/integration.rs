//! Integration tests for events

#[cfg(test)]
mod tests {
    use dlock_events::*;
    use dlock_types::Algorithm;

    #[tokio::test]
    async fn test_event_sender_emits() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_detection(DetectionEvent::Completed {
            algorithm: Algorithm::Matrix,
            deadlocked: true,
            deadlocked_processes: vec![0, 2],
        });

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Error { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Error);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.meta.source, EventSource::DETECTION);
        assert!(matches!(
            second.event,
            AppEvent::Detection(DetectionEvent::Completed { deadlocked: true, .. })
        ));
    }

    #[tokio::test]
    async fn test_general_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_debug("selected matrix");
        tx.emit_warning_with_context("request too large", "request_bounds");

        let debug = rx.recv().await.unwrap();
        assert_eq!(debug.meta.level, EventLevel::Debug);
        assert!(matches!(
            debug.event,
            AppEvent::General(GeneralEvent::DebugLog { ref message }) if message == "selected matrix"
        ));

        let warning = rx.recv().await.unwrap();
        assert_eq!(warning.meta.level, EventLevel::Warn);
        assert!(matches!(
            warning.event,
            AppEvent::General(GeneralEvent::Warning { context: Some(ref context), .. })
                if context == "request_bounds"
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning_with_context("ignored", "detection");
    }

    #[test]
    fn test_noop_emitter() {
        NoopEmitter.emit_recovery(RecoveryEvent::SearchLimitExceeded {
            deadlocked: 40,
            limit: 16,
        });
    }

    #[test]
    fn test_log_levels() {
        let warn = AppEvent::Recovery(RecoveryEvent::SearchLimitExceeded {
            deadlocked: 40,
            limit: 16,
        });
        assert_eq!(warn.log_level(), tracing::Level::WARN);

        let info = AppEvent::Detection(DetectionEvent::Started {
            algorithm: Algorithm::Wfg,
            processes: 2,
            resource_types: 2,
        });
        assert_eq!(info.log_level(), tracing::Level::INFO);
        assert_eq!(info.log_target(), "dlock::events::detection");
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Detection(DetectionEvent::Started {
            algorithm: Algorithm::Wfg,
            processes: 2,
            resource_types: 1,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "detection");
        assert_eq!(json["event"]["type"], "Started");
        assert_eq!(json["event"]["algorithm"], "wfg");
    }
}
