// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic

//! User-data decoding integration tests
//!
//! Drives the metadata store through the public API with blobs shaped the
//! way a publishing application sends them.

use hdds_monitor::dynamic::{Extensibility, PrimitiveKind, TypeDescriptorBuilder};
use hdds_monitor::typecode::{TypeCodeCodec, TypeCodeError};
use hdds_monitor::user_data::{UserDataError, HEADER_LEN};
use hdds_monitor::{
    parse_user_data, DecodeOutcome, DescriptorCodec, MonitorContext, Readiness,
    TopicMetadataStore, TypeDescriptor, UserDataHeader,
};
use std::sync::Arc;

fn radar_type() -> TypeDescriptor {
    TypeDescriptorBuilder::new("radar::Plot")
        .field("range", PrimitiveKind::F64)
        .field("bearing", PrimitiveKind::F32)
        .string_field("source")
        .enum_field("quality", "radar::Quality", ["LOW", "MEDIUM", "HIGH"])
        .build()
}

fn radar_blob(has_key: bool, extensibility: Extensibility) -> Vec<u8> {
    UserDataHeader {
        has_key,
        extensibility,
    }
    .encode(&radar_type(), &TypeCodeCodec::new())
    .expect("encode")
}

#[test]
fn test_foreign_user_data_is_ignored() {
    let store = TopicMetadataStore::new();
    let codec = TypeCodeCodec::new();
    let blobs: [&[u8]; 4] = [b"", b"ABCxxxxxx", b"USR", b"USR\0\0\x01\x00\0"];
    for blob in blobs {
        assert_eq!(
            store.store_user_data("Radar", blob, &codec),
            DecodeOutcome::NotApplicable,
            "blob {:?}",
            blob
        );
    }
    assert_eq!(store.ready("Radar"), Readiness::Unknown);
}

#[test]
fn test_unknown_extensibility_is_reported() {
    let store = TopicMetadataStore::new();
    let mut blob = radar_blob(true, Extensibility::Final);
    blob[6] = 5;
    assert_eq!(
        store.store_user_data("Radar", &blob, &TypeCodeCodec::new()),
        DecodeOutcome::Failed(UserDataError::UnknownExtensibility(5))
    );
    assert!(store.get("Radar").is_none());
}

#[test]
fn test_decoded_type_is_recorded_once() {
    let ctx = MonitorContext::default();
    assert_eq!(
        ctx.decode("Radar", &radar_blob(false, Extensibility::Final)),
        DecodeOutcome::Decoded {
            has_key: false,
            extensibility: Extensibility::Final
        }
    );
    assert_eq!(
        ctx.decode("Radar", &radar_blob(true, Extensibility::Appendable)),
        DecodeOutcome::NotApplicable
    );

    let info = ctx.metadata().get("Radar").expect("topic");
    assert!(!info.has_key());
    assert_eq!(info.extensibility(), Extensibility::Final);
    let desc = info.descriptor().expect("descriptor");
    assert_eq!(desc.name, "radar::Plot");
    assert_eq!(desc.fields().map(<[_]>::len), Some(4));
}

#[test]
fn test_descriptor_len_matches_blob() {
    let blob = radar_blob(true, Extensibility::Appendable);
    let parsed = parse_user_data(&blob, &TypeCodeCodec::new())
        .expect("parse")
        .expect("applicable");
    assert_eq!(parsed.descriptor_len, blob.len() - HEADER_LEN);
    assert_eq!(parsed.descriptor, radar_type_roundtrip());
}

fn radar_type_roundtrip() -> TypeDescriptor {
    let codec = TypeCodeCodec::new();
    codec
        .decode(&codec.encode(&radar_type()).expect("encode"))
        .expect("decode")
}

/// Codec that refuses everything, to check failures leave no trace.
struct RejectingCodec;

impl DescriptorCodec for RejectingCodec {
    fn decode(
        &self,
        _bytes: &[u8],
    ) -> Result<TypeDescriptor, TypeCodeError> {
        Err(TypeCodeError::UnsupportedKind(0))
    }

    fn encode(
        &self,
        _descriptor: &TypeDescriptor,
    ) -> Result<Vec<u8>, TypeCodeError> {
        Ok(vec![0; 4])
    }
}

#[test]
fn test_custom_codec_failure_then_recovery() {
    let ctx = MonitorContext::with_codec(Default::default(), Arc::new(RejectingCodec));
    let blob = radar_blob(true, Extensibility::Final);
    assert!(matches!(
        ctx.decode("Radar", &blob),
        DecodeOutcome::Failed(UserDataError::Descriptor(_))
    ));
    assert_eq!(ctx.metadata().ready("Radar"), Readiness::Unknown);

    // The same blob succeeds with a working codec
    let store = ctx.metadata();
    assert!(store
        .store_user_data("Radar", &blob, &TypeCodeCodec::new())
        .is_decoded());
}

#[test]
fn test_random_user_data_never_panics() {
    let store = TopicMetadataStore::new();
    let codec = TypeCodeCodec::new();
    let valid = radar_blob(true, Extensibility::Appendable);
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..5000 {
        // Mutate a valid blob so that the decoder gets past the header
        let mut blob = valid.clone();
        for _ in 0..rng.usize(1..8) {
            let at = rng.usize(0..blob.len());
            blob[at] = rng.u8(..);
        }
        blob.truncate(rng.usize(0..=blob.len()));
        let _ = store.store_user_data("Fuzz", &blob, &codec);
        store.reset();
    }
}
