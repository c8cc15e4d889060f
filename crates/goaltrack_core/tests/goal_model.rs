use goaltrack_core::{decode_goals, encode_goals, validate_goal_list, Goal, GoalValidationError};

#[test]
fn goal_new_sets_defaults() {
    let goal = Goal::new("run 5k");

    assert!(!goal.id.is_empty());
    assert_eq!(goal.text, "run 5k");
    assert!(!goal.completed);
    assert!(goal.validate().is_ok());
}

#[test]
fn goal_serialization_uses_expected_wire_fields() {
    let mut goal = Goal::with_id("1700000000000k3j9x2abc", "learn rust");
    goal.completed = true;

    let json = serde_json::to_value(&goal).unwrap();
    assert_eq!(json["id"], "1700000000000k3j9x2abc");
    assert_eq!(json["text"], "learn rust");
    assert_eq!(json["completed"], true);
    assert_eq!(json.as_object().unwrap().len(), 3);

    let decoded: Goal = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, goal);
}

#[test]
fn list_roundtrip_yields_identical_sequence() {
    let mut goals = vec![
        Goal::new("first"),
        Goal::new("second\nwith newline"),
        Goal::new("  padded  "),
    ];
    goals[1].completed = true;

    let decoded = decode_goals(&encode_goals(&goals).unwrap()).unwrap();
    assert_eq!(decoded, goals);
}

#[test]
fn validate_rejects_blank_text_and_empty_id() {
    assert_eq!(
        Goal::with_id("a", "  ").validate().unwrap_err(),
        GoalValidationError::BlankText("a".to_string())
    );
    assert_eq!(
        Goal::with_id("", "text").validate().unwrap_err(),
        GoalValidationError::EmptyId
    );
}

#[test]
fn validate_list_rejects_duplicate_ids() {
    let goals = vec![Goal::with_id("x", "one"), Goal::with_id("x", "two")];
    assert_eq!(
        validate_goal_list(&goals).unwrap_err(),
        GoalValidationError::DuplicateId("x".to_string())
    );
}

#[test]
fn decode_rejects_malformed_json() {
    assert!(decode_goals("{not json").is_err());
    assert!(decode_goals(r#"{"id":"a"}"#).is_err());
}
