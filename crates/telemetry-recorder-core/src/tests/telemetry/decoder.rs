use crate::{CoreError, PayloadDecoder};

use chrono::Utc;

/// WHAT: A well-formed payload decodes into an untagged reading
/// WHY: The sensor board's JSON is the only input shape the engine accepts
#[test]
#[allow(clippy::unwrap_used)]
fn given_valid_payload_when_decoding_then_fields_populated() {
    // Given: A payload with all four numeric fields
    let payload = br#"{"velocidade": 1200.5, "tensao": 12.3, "corrente": 0.8, "temperatura": 41}"#;
    let before = Utc::now();

    // When: Decoding
    let reading = PayloadDecoder.decode(payload).unwrap();

    // Then: Values are copied, timestamp is the decode clock, no session
    assert_eq!(reading.velocity, 1200.5);
    assert_eq!(reading.voltage, 12.3);
    assert_eq!(reading.current, 0.8);
    assert_eq!(reading.temperature, 41.0);
    assert!(reading.recorded_at >= before);
    assert!(reading.recorded_at <= Utc::now());
    assert!(reading.session_id.is_none());
}

/// WHAT: Non-JSON bytes are rejected with a decode error
/// WHY: Garbage on the topic must never reach the buffer
#[test]
fn given_garbage_bytes_when_decoding_then_decode_error() {
    // Given: Bytes that are not JSON
    let payload = b"\xff\xfe not json";

    // When: Decoding
    let result = PayloadDecoder.decode(payload);

    // Then: Decode error
    assert!(matches!(result, Err(CoreError::Decode { .. })));
}

/// WHAT: Missing, non-numeric and unknown fields are all rejected
/// WHY: The schema decode is strict rather than best-effort
#[test]
fn given_nonconforming_shapes_when_decoding_then_each_rejected() {
    // Given: Payloads that are JSON but not the telemetry schema
    let payloads: [&[u8]; 5] = [
        br#"{"velocidade": 1, "tensao": 2, "corrente": 3}"#,
        br#"{"velocidade": "fast", "tensao": 2, "corrente": 3, "temperatura": 4}"#,
        br#"{"velocidade": 1, "tensao": 2, "corrente": 3, "temperatura": 4, "extra": 5}"#,
        br#"[1, 2, 3, 4]"#,
        br#"{"velocidade": null, "tensao": 2, "corrente": 3, "temperatura": 4}"#,
    ];

    for payload in payloads {
        // When: Decoding
        let result = PayloadDecoder.decode(payload);

        // Then: Every shape is a decode error
        assert!(
            matches!(result, Err(CoreError::Decode { .. })),
            "accepted {:?}",
            String::from_utf8_lossy(payload)
        );
    }
}

/// WHAT: Valid JSON that is not an object is rejected
/// WHY: Arrays and scalars would otherwise bind to the fields by position
#[test]
fn given_non_object_json_when_decoding_then_decode_error() {
    // Given: Arrays and scalars, including one with exactly four numbers
    let payloads: [&[u8]; 5] = [
        br#"[1200.5, 12.3, 0.8, 41]"#,
        br#"[]"#,
        br#""velocidade""#,
        br#"42"#,
        br#"null"#,
    ];

    for payload in payloads {
        // When: Decoding
        let result = PayloadDecoder.decode(payload);

        // Then: Decode error
        assert!(
            matches!(result, Err(CoreError::Decode { .. })),
            "accepted {:?}",
            String::from_utf8_lossy(payload)
        );
    }
}
