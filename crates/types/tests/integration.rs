//! Integration tests for types

#[cfg(test)]
mod tests {
    use dlock_errors::UserFacingError;
    use dlock_types::*;
    use proptest::prelude::*;

    prop_compose! {
        // Valid state: available is derived from random totals minus allocations.
        fn arb_state()(n in 0usize..5, m in 0usize..4)
            (allocation in prop::collection::vec(prop::collection::vec(0u32..4, m), n),
             request in prop::collection::vec(prop::collection::vec(0u32..4, m), n),
             spare in prop::collection::vec(0u32..3, m))
            -> SystemState
        {
            let n = allocation.len();
            let m = spare.len();
            let mut state = SystemState::blank(n, m);
            for j in 0..m {
                let held: u32 = allocation.iter().map(|row| row[j]).sum();
                state.resource_types[j].instances = held + spare[j];
                state.available[j] = spare[j];
            }
            state.allocation = allocation;
            state.request = request;
            state
        }
    }

    proptest! {
        #[test]
        fn prop_generated_states_validate(state in arb_state()) {
            prop_assert!(validate(&state).is_ok());
        }

        #[test]
        fn prop_document_preserves_state(state in arb_state()) {
            let json = export_json(&state).unwrap();
            prop_assert_eq!(import_json(&json).unwrap(), state);
        }
    }

    #[test]
    fn test_format_helpers() {
        let pids: PidSet = [2, 0, 5].into_iter().collect();
        assert_eq!(format_pids(&pids), "P0, P2, P5");
        let rids: RidSet = [1, 0].into_iter().collect();
        assert_eq!(format_rids(&rids), "R0, R1");
        assert_eq!(format_vector(&[3, 3, 2]), "[3, 3, 2]");
        assert_eq!(format_vector(&[]), "[]");
    }

    #[test]
    fn test_empty_document() {
        let json = r#"{"schema_version":"1.0","processes":[],"resource_types":[],
                      "available":[],"allocation":[],"request":[]}"#;
        let state = import_json(json).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_import_rejects_conservation_violation() {
        let json = r#"{"schema_version":"1.0",
            "processes":[{"pid":0,"name":"P0"}],
            "resource_types":[{"rid":0,"name":"R0","instances":2}],
            "available":[0],"allocation":[[1]],"request":[[0]]}"#;
        let err = import_json(json).unwrap_err();
        assert_eq!(err.user_code(), Some("validation.conservation"));
    }

    #[test]
    fn test_algorithm_selection() {
        let mut state = SystemState::blank(2, 2);
        state.available = vec![1, 1];
        assert_eq!(Algorithm::for_state(&state), Algorithm::Wfg);

        state.resource_types[0].instances = 2;
        state.available[0] = 2;
        assert_eq!(Algorithm::for_state(&state), Algorithm::Matrix);

        // no resource types: vacuously single-instance
        assert_eq!(Algorithm::for_state(&SystemState::default()), Algorithm::Wfg);
        assert_eq!(serde_json::to_string(&Algorithm::Matrix).unwrap(), r#""matrix""#);
    }
}
