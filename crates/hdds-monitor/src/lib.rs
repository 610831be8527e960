// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HDDS Monitor
//!
//! Runtime core of a type-agnostic topic inspector. Applications publishing
//! on DDS announce their topic types in endpoint user data; the monitor
//! decodes those announcements, decodes raw samples with them, keeps a
//! bounded history per topic and extracts individual fields as display-ready
//! values. Nothing here needs the topic types at compile time.
//!
//! # Features
//!
//! - **User-data type decoding** -- `"USR"` header + CORBA TypeCode
//! - **Dynamic samples** -- CDR payloads decoded into named member trees
//! - **Bounded sample cache** -- newest first, strict FIFO eviction
//! - **Field extraction** -- `(sample, member)` to a [`FieldValue`]
//! - **QoS tracking** -- endpoint QoS propagated to the topic's reader/writer QoS
//!
//! # Architecture
//!
//! ```text
//! MonitorContext
//! +-- TopicMetadataStore   (topic -> TopicInfo: type, QoS, partitions)
//! +-- SampleCache          (topic -> newest-first samples)
//! +-- DescriptorCodec      (TypeCodeCodec by default)
//! +-- TopicFeed *          (transport boundary, one per inspected topic)
//! ```
//!
//! # Example
//!
//! ```
//! use hdds_monitor::dynamic::{Extensibility, PrimitiveKind, TypeDescriptorBuilder};
//! use hdds_monitor::typecode::TypeCodeCodec;
//! use hdds_monitor::user_data::UserDataHeader;
//! use hdds_monitor::{
//!     CdrWriter, DiscoveryEvent, Endianness, FieldValue, MonitorConfig, MonitorContext,
//!     RawSample,
//! };
//!
//! # fn main() -> hdds_monitor::Result<()> {
//! let ctx = MonitorContext::new(MonitorConfig::default());
//!
//! // Publisher side: announce the type in user data
//! let desc = TypeDescriptorBuilder::new("Track")
//!     .field("id", PrimitiveKind::U32)
//!     .string_field("callsign")
//!     .build();
//! let header = UserDataHeader { has_key: true, extensibility: Extensibility::Final };
//! let user_data = header.encode(&desc, &TypeCodeCodec::new()).expect("encodable");
//!
//! // Discovery delivers it to the monitor
//! ctx.on_discovery("Tracks", &DiscoveryEvent::matched(user_data));
//! let feed = ctx.open_feed("Tracks")?;
//!
//! // Samples arrive as raw CDR
//! let mut w = CdrWriter::new(Endianness::Little);
//! w.write_u32(7);
//! w.write_string("AF12");
//! feed.on_sample(&RawSample::new(w.into_bytes(), Endianness::Little));
//!
//! assert_eq!(ctx.read_value("Tracks", "callsign", 0), FieldValue::Text("AF12".into()));
//! assert_eq!(ctx.read_value("Tracks", "id", 0).to_string(), "7");
//! assert!(ctx.read_value("Tracks", "missing", 0).is_null());
//!
//! ctx.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cdr;
pub mod config;
pub mod context;
pub mod dynamic;
pub mod error;
pub mod extract;
pub mod feed;
pub mod metadata;
pub mod qos;
pub mod typecode;
pub mod user_data;

pub use cache::{SampleCache, SampleLabel, MAX_SAMPLES};
pub use cdr::{CdrReader, CdrWriter, Endianness};
pub use config::{MonitorConfig, MonitorConfigBuilder};
pub use context::MonitorContext;
pub use dynamic::{Extensibility, MemberKind, Sample, TypeDescriptor};
pub use error::{Error, Result};
pub use extract::{extract, FieldValue};
pub use feed::{
    DiscoveryEvent, FeedState, MatchKind, RawSample, SampleDisposition, TopicFeed,
};
pub use metadata::{Readiness, TopicInfo, TopicMetadataStore};
pub use qos::{QoS, QosBundle};
pub use typecode::{DescriptorCodec, TypeCodeCodec};
pub use user_data::{parse_user_data, DecodeOutcome, UserDataHeader};
