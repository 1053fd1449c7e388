//! Happy path tests for response framing
//!
//! Tests verify captured extraction output decodes into header and payload.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::arithmetic_side_effects)]

use std::io::Cursor;

use potree_frame::{DEFAULT_PREVIEW_BYTES, decode, encode, read_response, write_frame};
use proptest::prelude::*;

const PROFILE_HEADER: &str = r#"{
	"points": 2,
	"pointsProcessed": 57,
	"nodesProcessed": 3,
	"durationMS": 4,
	"boundingBox": {
		"lx": 693550.968000,
		"ly": 3915914.169000,
		"lz": 20.000000,
		"ux": 693560.000000,
		"uy": 3915920.000000,
		"uz": 25.000000
	},
	"pointAttributes": [
		"POSITION_PROJECTED_PROFILE"
	],
	"bytesPerPoint": 8,
	"scale": 0.001000
}
"#;

#[test]
fn test_decode_captured_profile_response() {
    let payload: Vec<u8> = (0u8..16).collect();
    let captured = encode(PROFILE_HEADER, &payload).expect("encode should succeed");

    let frame = decode(&captured).expect("decode should succeed");

    assert_eq!(frame.header(), PROFILE_HEADER);
    assert_eq!(frame.payload(), payload.as_slice());

    let header = frame.parse_header().expect("header should parse");
    assert_eq!(header.points, 2);
    assert_eq!(
        header.expected_payload_len(),
        Some(frame.payload().len() as u64)
    );
}

#[test]
fn test_decode_current_writer_response() {
    // Current writer output: trailing commas and bare inf for empty bounds.
    let header = "{\n\
        \t\"points\": 0,\n\
        \t\"pointsProcessed\": 12,\n\
        \t\"nodesProcessed\": 1,\n\
        \t\"durationMS\": 0.100000,\n\
        \t\"boundingBox\": {\n\
        \t\t\"min\": [inf, inf, inf],\n\
        \t\t\"max\": [-inf, -inf, -inf],\n\
        \t},\n\
        \t\"attributes\": [\n\
        \t\t{\n\
        \t\t\t\"name\": \"position\",\n\
        \t\t\t\"description\": \"\",\n\
        \t\t\t\"size\": 12,\n\
        \t\t\t\"numElements\": 3,\n\
        \t\t\t\"elementSize\": 4,\n\
        \t\t\t\"type\": \"int32\",\n\
        \t\t}\n\
        \t],\n\
        \t\"bytesPerPoint\": 12,\n\
        \t\"scale\": 0.001000\n\
        }\n";
    let captured = encode(header, b"").expect("encode should succeed");

    let frame = decode(&captured).expect("decode should succeed");
    let parsed = frame.parse_header().expect("writer header should parse");

    assert_eq!(frame.header(), header);
    assert!(parsed.bounding_box.is_empty());
    assert_eq!(parsed.attribute_names().collect::<Vec<_>>(), vec!["position"]);
    assert_eq!(parsed.expected_payload_len(), Some(0));
}

#[test]
fn test_read_response_buffers_whole_stream() {
    let mut captured = Vec::new();
    write_frame(&mut captured, "hello", b"WORLD").expect("write should succeed");

    let response = read_response(Cursor::new(captured)).expect("read should succeed");

    assert_eq!(response.header(), "hello");
    assert_eq!(response.payload(), b"WORLD");
}

#[test]
fn test_read_response_handles_large_payload() {
    let payload = vec![0xabu8; 4 * 1024 * 1024];
    let captured = encode("{}", &payload).expect("encode should succeed");

    let response = read_response(captured.as_slice()).expect("read should succeed");

    assert_eq!(response.payload().len(), payload.len());
    assert_eq!(response.preview(DEFAULT_PREVIEW_BYTES), &payload[..50]);
}

#[test]
fn test_into_parts_returns_owned_data() {
    let captured = encode("abc", b"\x00\x01").expect("encode should succeed");
    let response = read_response(captured.as_slice()).expect("read should succeed");

    let (header, payload) = response.into_parts();

    assert_eq!(header, "abc");
    assert_eq!(payload, vec![0, 1]);
}

proptest! {
    #[test]
    fn prop_encode_then_decode_returns_inputs(
        header in "[\\x00-\\x7f]{0,256}",
        payload in proptest::collection::vec(any::<u8>(), 0..1024),
    ) {
        let bytes = encode(&header, &payload).unwrap();
        let frame = decode(&bytes).unwrap();

        prop_assert_eq!(frame.header(), header.as_str());
        prop_assert_eq!(frame.payload(), payload.as_slice());
    }
}
