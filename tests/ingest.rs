//! Ingestion of sequences written by the text-generation service.

use seqc::ingest::{extract_json_object, ingest_sequence};
use seqc::{CompileOptions, StepType};
use serde_json::json;

#[test]
fn generated_response_is_canonicalized() {
    let text = include_str!("fixtures/generated_response.txt");
    let sequence = ingest_sequence(text, &CompileOptions::default()).unwrap();

    assert_eq!(
        serde_json::to_value(&sequence).unwrap(),
        json!({
            "sequence_name": "Pick and Return",
            "steps": [
                {"id": "step_0", "type": "START", "params": {}, "next": "step_1"},
                {
                    "id": "step_1",
                    "type": "LINEAR_MOVE",
                    "params": {"target": {"X": 120, "Y": 45.5, "Z": 0}, "speed": 300},
                    "next": "step_2"
                },
                {"id": "step_2", "type": "WAIT", "params": {"delay_ms": 500}, "next": "step_3"},
                {
                    "id": "step_3",
                    "type": "GOTO",
                    "params": {"to": "step_1", "description": "repeat"},
                    "next": "step_4"
                },
                {"id": "step_4", "type": "END", "params": {}, "next": null},
            ]
        })
    );
}

#[test]
fn compiled_output_ingests_unchanged() {
    let compiled = json!({
        "sequence_name": "Axis test",
        "steps": [
            {"id": "node_01", "type": "START", "params": {}, "next": "node_02"},
            {"id": "node_02", "type": "MOTION", "params": {"axis": "X", "pos": 1000, "speed": 500}, "next": "node_03"},
            {"id": "node_03", "type": "END", "params": {}, "next": null},
        ]
    });
    let sequence = ingest_sequence(&compiled.to_string(), &CompileOptions::default()).unwrap();
    assert_eq!(serde_json::to_value(&sequence).unwrap(), compiled);
}

#[test]
fn missing_ids_and_name_are_filled() {
    let text = r#"{"steps":[{"type":"m","params":{"axis":"Y","pos":"12","speed":4}},{"type":"io","params":{"port":2}}]}"#;
    let sequence = ingest_sequence(text, &CompileOptions::named("Fallback")).unwrap();

    assert_eq!(sequence.sequence_name, "Fallback");
    assert_eq!(sequence.steps[0].id, "node_01");
    assert_eq!(sequence.steps[0].step_type, StepType::Motion);
    assert_eq!(sequence.steps[0].next.as_deref(), Some("node_02"));
    assert_eq!(sequence.steps[1].id, "node_02");
    assert_eq!(sequence.steps[1].next, None);
    assert_eq!(
        serde_json::to_value(&sequence.steps[0].params).unwrap(),
        json!({"axis": "Y", "pos": 12, "speed": 4})
    );
    assert_eq!(
        serde_json::to_value(&sequence.steps[1].params).unwrap(),
        json!({"port": 2})
    );
}

#[test]
fn extract_takes_outermost_braces() {
    assert_eq!(
        extract_json_object("text {\"a\": {\"b\": 1}} trailing").unwrap(),
        "{\"a\": {\"b\": 1}}"
    );
    assert_eq!(extract_json_object("} backwards {").unwrap_err().code, "I001");
}

#[test]
fn wrong_shape_is_reported() {
    let err = ingest_sequence(r#"{"steps": "none"}"#, &CompileOptions::default()).unwrap_err();
    assert_eq!(err.code, "I002");
    assert!(err.to_string().starts_with("[Ingest:I002]"));
}
