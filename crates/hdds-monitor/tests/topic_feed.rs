// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::float_cmp)] // Test assertions with constants

//! Topic feed integration tests
//!
//! End-to-end path: discovery event with user data -> open feed -> raw CDR
//! samples -> cached samples -> extracted fields.

use hdds_monitor::dynamic::{
    Extensibility, PrimitiveKind, SampleDecodeError, TypeDescriptorBuilder,
};
use hdds_monitor::qos::{Durability, History, Reliability};
use hdds_monitor::typecode::TypeCodeCodec;
use hdds_monitor::{
    CdrWriter, DiscoveryEvent, Endianness, Error, FeedState, FieldValue, MonitorConfig,
    MonitorContext, QoS, RawSample, Readiness, SampleDisposition, UserDataHeader,
};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, UNIX_EPOCH};

fn announce(ctx: &MonitorContext, topic: &str, extensibility: Extensibility) {
    let desc = TypeDescriptorBuilder::new("Track")
        .field("id", PrimitiveKind::U32)
        .field("speed", PrimitiveKind::F64)
        .string_field("callsign")
        .field("active", PrimitiveKind::Bool)
        .enum_field("kind", "TrackKind", ["AIR", "SEA", "LAND"])
        .build();
    let user_data = UserDataHeader {
        has_key: true,
        extensibility,
    }
    .encode(&desc, &TypeCodeCodec::new())
    .expect("encode");
    let event = DiscoveryEvent::matched(user_data)
        .with_qos(QoS::best_effort().reliable().keep_last(8))
        .with_partitions(["ops", "air"]);
    assert!(ctx.on_discovery(topic, &event).is_decoded());
}

fn track_fields(w: &mut CdrWriter, id: u32) {
    w.write_u32(id);
    w.write_f64(f64::from(id) * 1.5);
    w.write_string(&format!("TRK{}", id));
    w.write_u8(1);
    w.write_u32(id % 3);
}

fn final_sample(id: u32, endianness: Endianness) -> RawSample {
    let mut w = CdrWriter::new(endianness);
    track_fields(&mut w, id);
    RawSample::new(w.into_bytes(), endianness)
}

fn appendable_sample(id: u32) -> RawSample {
    let mut w = CdrWriter::new(Endianness::Little);
    w.write_u32(0);
    track_fields(&mut w, id);
    let mut payload = w.into_bytes();
    let body_len = (payload.len() - 4) as u32;
    payload[..4].copy_from_slice(&body_len.to_le_bytes());
    RawSample::new(payload, Endianness::Little)
}

#[test]
fn test_end_to_end_final() {
    let ctx = MonitorContext::default();
    announce(&ctx, "Tracks", Extensibility::Final);
    let feed = ctx.open_feed("Tracks").expect("feed");

    for id in 1..=3 {
        assert!(matches!(
            feed.on_sample(&final_sample(id, Endianness::Big)),
            SampleDisposition::Stored(_)
        ));
    }

    assert_eq!(ctx.read_value("Tracks", "id", 0), FieldValue::U32(3));
    assert_eq!(ctx.read_value("Tracks", "speed", 0), FieldValue::F64(4.5));
    assert_eq!(
        ctx.read_value("Tracks", "callsign", 2),
        FieldValue::Text("TRK1".into())
    );
    assert_eq!(ctx.read_value("Tracks", "active", 1), FieldValue::U32(1));
    assert_eq!(ctx.read_value("Tracks", "kind", 0), FieldValue::U32(0));
    assert_eq!(ctx.read_value("Tracks", "id", 3), FieldValue::Null);
    assert_eq!(ctx.read_value("Tracks", "id", 0).to_string(), "3");
}

#[test]
fn test_end_to_end_appendable() {
    let ctx = MonitorContext::default();
    announce(&ctx, "Tracks", Extensibility::Appendable);
    let feed = ctx.open_feed("Tracks").expect("feed");

    assert!(matches!(
        feed.on_sample(&appendable_sample(5)),
        SampleDisposition::Stored(_)
    ));
    assert_eq!(
        ctx.read_value("Tracks", "callsign", 0),
        FieldValue::Text("TRK5".into())
    );
}

#[test]
fn test_mutable_topics_are_rejected() {
    let ctx = MonitorContext::default();
    announce(&ctx, "Tracks", Extensibility::Mutable);
    let feed = ctx.open_feed("Tracks").expect("feed");
    assert_eq!(
        feed.on_sample(&final_sample(1, Endianness::Little)),
        SampleDisposition::Rejected(SampleDecodeError::UnsupportedExtensibility(
            Extensibility::Mutable
        ))
    );
    assert!(ctx.cache().list_labels("Tracks").is_empty());
}

#[test]
fn test_discovery_qos_reaches_topic_info() {
    let ctx = MonitorContext::default();
    announce(&ctx, "Tracks", Extensibility::Final);

    let info = ctx.metadata().get("Tracks").expect("info");
    let qos = info.qos();
    assert_eq!(qos.reader.reliability, Reliability::Reliable);
    assert_eq!(qos.reader.durability, Durability::Volatile);
    assert_eq!(qos.reader.history, History::KeepAll);
    let partitions: Vec<&str> = info.partitions().iter().map(String::as_str).collect();
    assert_eq!(partitions, vec!["air", "ops"]);
}

#[test]
fn test_pause_and_resume() {
    let ctx = MonitorContext::default();
    announce(&ctx, "Tracks", Extensibility::Final);
    let feed = ctx.open_feed("Tracks").expect("feed");

    feed.pause();
    assert_eq!(feed.state(), FeedState::Paused);
    for id in 0..10 {
        assert_eq!(
            feed.on_sample(&final_sample(id, Endianness::Little)),
            SampleDisposition::Paused
        );
    }
    assert_eq!(ctx.cache().len("Tracks"), 0);

    feed.unpause();
    assert_eq!(feed.state(), FeedState::Active);
    feed.on_sample(&final_sample(11, Endianness::Little));
    assert_eq!(ctx.cache().len("Tracks"), 1);
}

#[test]
fn test_readiness_progression() {
    let ctx = MonitorContext::default();
    assert!(matches!(ctx.readiness_check("Tracks"), Err(Error::NotFound(_))));

    ctx.on_discovery(
        "Tracks",
        &DiscoveryEvent::matched(Vec::new()).with_qos(QoS::best_effort()),
    );
    assert_eq!(ctx.metadata().ready("Tracks"), Readiness::MetadataOnly);
    assert!(matches!(ctx.readiness_check("Tracks"), Err(Error::NotReady(_))));

    announce(&ctx, "Tracks", Extensibility::Final);
    assert!(ctx.readiness_check("Tracks").is_ok());
}

#[test]
fn test_labels_follow_arrival_order() {
    let ctx = MonitorContext::new(
        MonitorConfig::builder()
            .max_samples(4)
            .build()
            .expect("config"),
    );
    announce(&ctx, "Tracks", Extensibility::Final);
    let feed = ctx.open_feed("Tracks").expect("feed");

    for id in 0..6u32 {
        let mut raw = final_sample(id, Endianness::Little);
        raw.reception_timestamp = UNIX_EPOCH + Duration::from_secs(u64::from(id));
        feed.on_sample(&raw);
    }
    let labels = ctx.cache().list_labels("Tracks");
    let seqs: Vec<u64> = labels.iter().map(|l| l.sequence).collect();
    assert_eq!(seqs, vec![5, 4, 3, 2]);
    assert!(labels[0].to_string().ends_with("#5"));
}

#[test]
fn test_shutdown_is_idempotent() {
    let ctx = MonitorContext::default();
    announce(&ctx, "Tracks", Extensibility::Final);
    let feed = ctx.open_feed("Tracks").expect("feed");
    feed.on_sample(&final_sample(1, Endianness::Little));

    ctx.shutdown();
    ctx.shutdown();

    assert!(ctx.metadata().is_empty());
    assert_eq!(ctx.cache().len("Tracks"), 0);
    assert_eq!(
        feed.on_sample(&final_sample(2, Endianness::Little)),
        SampleDisposition::Closed
    );
    assert!(matches!(
        ctx.on_sample("Tracks", &final_sample(3, Endianness::Little)),
        Err(Error::ShutDown)
    ));
}

#[test]
fn test_concurrent_producers_keep_labels_newest_first() {
    const PRODUCERS: u32 = 8;
    const PER_PRODUCER: u32 = 2000;

    let ctx = MonitorContext::new(
        MonitorConfig::builder()
            .max_samples((PRODUCERS * PER_PRODUCER) as usize)
            .build()
            .expect("config"),
    );
    announce(&ctx, "Tracks", Extensibility::Final);
    let feed = ctx.open_feed("Tracks").expect("feed");

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let feed = Arc::clone(&feed);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    let raw = final_sample(p * PER_PRODUCER + i, Endianness::Little);
                    assert!(matches!(feed.on_sample(&raw), SampleDisposition::Stored(_)));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer panicked");
    }

    let labels = ctx.cache().list_labels("Tracks");
    assert_eq!(labels.len(), (PRODUCERS * PER_PRODUCER) as usize);
    for pair in labels.windows(2) {
        assert!(
            pair[0].sequence > pair[1].sequence,
            "label {} cached ahead of {}",
            pair[0].sequence,
            pair[1].sequence
        );
    }
}

#[test]
fn test_appendable_double_after_octet() {
    let ctx = MonitorContext::default();
    let desc = TypeDescriptorBuilder::new("Reading")
        .field("a", PrimitiveKind::U32)
        .field("b", PrimitiveKind::Octet)
        .field("c", PrimitiveKind::F64)
        .build();
    let user_data = UserDataHeader {
        has_key: false,
        extensibility: Extensibility::Appendable,
    }
    .encode(&desc, &TypeCodeCodec::new())
    .expect("encode");
    ctx.on_discovery("Readings", &DiscoveryEvent::matched(user_data));
    let feed = ctx.open_feed("Readings").expect("feed");

    let mut w = CdrWriter::new(Endianness::Big).with_max_alignment(4);
    w.write_u32(16);
    w.write_u32(7);
    w.write_u8(1);
    w.write_f64(2.5);
    let payload = w.into_bytes();
    assert_eq!(payload.len(), 20);

    assert!(matches!(
        feed.on_sample(&RawSample::new(payload, Endianness::Big)),
        SampleDisposition::Stored(_)
    ));
    assert_eq!(ctx.read_value("Readings", "c", 0), FieldValue::F64(2.5));
    assert_eq!(ctx.read_value("Readings", "b", 0), FieldValue::U8(1));
}
