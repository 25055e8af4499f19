use crate::{
    SosConfig,
    collaborators::{AlertPayload, Notice},
};

/// WHAT: Payload JSON uses camelCase and omits missing coordinates
/// WHY: Matches the notification service's request schema
#[test]
#[allow(clippy::unwrap_used)]
fn given_payload_without_location_when_serialized_then_coordinates_omitted() {
    // Given: A payload with no location fix
    let payload = AlertPayload {
        audio_base64: "UklGRg==".to_string(),
        mime_type: "audio/wav".to_string(),
        duration_seconds: 10,
        started_at: None,
        lat: None,
        lng: None,
    };

    // When: Serialized to JSON
    let json = serde_json::to_value(&payload).unwrap();

    // Then: Keys are camelCase and coordinates are absent
    assert_eq!(json["audioBase64"], "UklGRg==");
    assert_eq!(json["mimeType"], "audio/wav");
    assert_eq!(json["durationSeconds"], 10);
    assert!(json.get("lat").is_none());
    assert!(json.get("lng").is_none());
    assert!(json.get("startedAt").is_none());
}

/// WHAT: Payload JSON carries coordinates when present
/// WHY: Contacts need the operator's position
#[test]
#[allow(clippy::unwrap_used)]
fn given_payload_with_location_when_serialized_then_coordinates_included() {
    // Given: A payload with a fix
    let payload = AlertPayload {
        audio_base64: String::new(),
        mime_type: "audio/wav".to_string(),
        duration_seconds: 10,
        started_at: None,
        lat: Some(-12.05),
        lng: Some(-77.03),
    };

    // When: Serialized to JSON
    let json = serde_json::to_value(&payload).unwrap();

    // Then: Both coordinates are present
    assert_eq!(json["lat"], -12.05);
    assert_eq!(json["lng"], -77.03);
}

/// WHAT: Default timings match the reference behavior
/// WHY: 2s hold and 10s capture window are the documented defaults
#[test]
fn given_default_config_when_reading_durations_then_reference_values() {
    // Given/When: Default configuration
    let config = SosConfig::default();

    // Then: Reference timings apply
    assert_eq!(config.confirm_hold().as_millis(), 2_000);
    assert_eq!(config.capture_window().as_millis(), 10_000);
}

/// WHAT: Only failure notices are flagged as errors
/// WHY: The UI styles errors differently from confirmations
#[test]
fn given_notices_when_classifying_then_only_failures_are_errors() {
    assert!(!Notice::ActivationStarted.is_error());
    assert!(
        !Notice::AlertDelivered {
            message: "ok".to_string()
        }
        .is_error()
    );
    assert!(Notice::MicrophoneDenied.is_error());
    assert!(
        Notice::DispatchFailed {
            reason: "timeout".to_string()
        }
        .is_error()
    );
}
