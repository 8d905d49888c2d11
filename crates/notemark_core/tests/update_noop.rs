use notemark_core::{update, ImportSession, Msg, PageMetadata, SessionPlan};

#[test]
fn stray_messages_before_start_are_noops() {
    let state = ImportSession::new(SessionPlan {
        targets: vec!["https://a.example.com".to_string()],
        ..SessionPlan::default()
    });

    for msg in [
        Msg::PauseElapsed,
        Msg::WriteSucceeded { index: 0 },
        Msg::WriteFailed {
            index: 0,
            reason: "rejected".to_string(),
        },
        Msg::Resolved {
            index: 0,
            metadata: PageMetadata::default(),
        },
    ] {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(state, next);
        assert!(effects.is_empty());
    }
}
