// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic user-data type header.
//!
//! Publishers that want their topics to be inspectable announce the topic
//! type inside the endpoint user data:
//!
//! ```text
//! offset 0-2  : "USR"
//! offset 3-4  : reserved
//! offset 5    : key flag (1 = keyed)
//! offset 6    : extensibility (0 = APPENDABLE, 1 = FINAL, 2 = MUTABLE)
//! offset 7    : padding
//! offset 8..  : type descriptor (see [`crate::typecode`])
//! ```
//!
//! User data that does not follow this layout belongs to someone else and
//! is ignored, not reported as an error.

use crate::dynamic::{Extensibility, TypeDescriptor};
use crate::typecode::{DescriptorCodec, TypeCodeError};
use thiserror::Error;

/// Leading magic bytes.
pub const USER_DATA_MAGIC: &[u8; 3] = b"USR";

/// Size of the fixed header preceding the descriptor.
pub const HEADER_LEN: usize = 8;

const KEY_FLAG_OFFSET: usize = 5;
const EXTENSIBILITY_OFFSET: usize = 6;

/// Errors for user data that carries the magic but cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserDataError {
    #[error("unknown extensibility code {0}")]
    UnknownExtensibility(u8),
    #[error("type descriptor: {0}")]
    Descriptor(#[from] TypeCodeError),
}

/// Result of offering user data to the metadata store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Empty, foreign or redundant user data. Nothing changed.
    NotApplicable,
    /// Header present but unusable. Nothing changed.
    Failed(UserDataError),
    /// Descriptor and flags recorded for the topic.
    Decoded {
        has_key: bool,
        extensibility: Extensibility,
    },
}

impl DecodeOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded { .. })
    }
}

/// The fixed 8-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDataHeader {
    pub has_key: bool,
    pub extensibility: Extensibility,
}

impl Default for UserDataHeader {
    fn default() -> Self {
        Self {
            has_key: true,
            extensibility: Extensibility::Appendable,
        }
    }
}

impl UserDataHeader {
    /// Parse the header of `blob`.
    ///
    /// Returns `Ok(None)` when the blob is not ours: too short to carry a
    /// descriptor, or without the magic.
    pub fn parse(blob: &[u8]) -> Result<Option<Self>, UserDataError> {
        if blob.len() <= HEADER_LEN || !blob.starts_with(USER_DATA_MAGIC) {
            return Ok(None);
        }
        let code = blob[EXTENSIBILITY_OFFSET];
        let extensibility =
            Extensibility::from_code(code).ok_or(UserDataError::UnknownExtensibility(code))?;
        Ok(Some(Self {
            has_key: blob[KEY_FLAG_OFFSET] == 1,
            extensibility,
        }))
    }

    /// Build a complete user-data blob announcing `descriptor`.
    pub fn encode(
        &self,
        descriptor: &TypeDescriptor,
        codec: &dyn DescriptorCodec,
    ) -> Result<Vec<u8>, TypeCodeError> {
        let body = codec.encode(descriptor)?;
        let mut blob = Vec::with_capacity(HEADER_LEN + body.len());
        blob.extend_from_slice(USER_DATA_MAGIC);
        blob.extend_from_slice(&[0, 0]);
        blob.push(u8::from(self.has_key));
        blob.push(self.extensibility.code());
        blob.push(0);
        blob.extend_from_slice(&body);
        Ok(blob)
    }
}

/// Type information recovered from user data.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDataType {
    pub header: UserDataHeader,
    pub descriptor: TypeDescriptor,
    /// Length in bytes of the encoded descriptor.
    pub descriptor_len: usize,
}

/// Parse a user-data blob.
///
/// `Ok(None)` means the blob does not apply (empty, too short, no magic).
/// Never panics on arbitrary input.
pub fn parse_user_data(
    blob: &[u8],
    codec: &dyn DescriptorCodec,
) -> Result<Option<UserDataType>, UserDataError> {
    let Some(header) = UserDataHeader::parse(blob)? else {
        return Ok(None);
    };
    let body = &blob[HEADER_LEN..];
    let descriptor = codec.decode(body)?;
    Ok(Some(UserDataType {
        header,
        descriptor,
        descriptor_len: body.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::{PrimitiveKind, TypeDescriptorBuilder};
    use crate::typecode::TypeCodeCodec;

    fn track_type() -> TypeDescriptor {
        TypeDescriptorBuilder::new("Track")
            .field("id", PrimitiveKind::U32)
            .string_field("callsign")
            .build()
    }

    #[test]
    fn test_not_applicable_blobs() {
        let codec = TypeCodeCodec::new();
        assert_eq!(parse_user_data(b"", &codec), Ok(None));
        assert_eq!(parse_user_data(b"ABCxxxxxx", &codec), Ok(None));
        assert_eq!(parse_user_data(b"USR\0\0\x01\x00\0", &codec), Ok(None));
    }

    #[test]
    fn test_unknown_extensibility() {
        let codec = TypeCodeCodec::new();
        let blob = b"USR\0\0\x01\x05\0\x0f\0\0\0";
        assert_eq!(
            parse_user_data(blob, &codec),
            Err(UserDataError::UnknownExtensibility(5))
        );
    }

    #[test]
    fn test_bad_descriptor() {
        let codec = TypeCodeCodec::new();
        let blob = b"USR\0\0\x01\x00\0\x0b\0\0\0";
        assert_eq!(
            parse_user_data(blob, &codec),
            Err(UserDataError::Descriptor(TypeCodeError::UnsupportedKind(11)))
        );
    }

    #[test]
    fn test_encode_then_parse() {
        let codec = TypeCodeCodec::new();
        let header = UserDataHeader {
            has_key: false,
            extensibility: Extensibility::Final,
        };
        let blob = header.encode(&track_type(), &codec).expect("encode");
        assert_eq!(&blob[..3], USER_DATA_MAGIC);
        assert_eq!(&blob[3..5], &[0, 0]);
        assert_eq!(blob[7], 0);

        let parsed = parse_user_data(&blob, &codec).expect("parse").expect("applicable");
        assert_eq!(parsed.header, header);
        assert_eq!(parsed.descriptor, codec.decode(&blob[HEADER_LEN..]).unwrap());
        assert_eq!(parsed.descriptor_len, blob.len() - HEADER_LEN);
    }

    #[test]
    fn test_key_flag_other_than_one_means_unkeyed() {
        let codec = TypeCodeCodec::new();
        let mut blob = UserDataHeader::default()
            .encode(&track_type(), &codec)
            .unwrap();
        blob[KEY_FLAG_OFFSET] = 2;
        let parsed = parse_user_data(&blob, &codec).unwrap().unwrap();
        assert!(!parsed.header.has_key);
    }

    #[test]
    fn test_random_blobs_never_panic() {
        let codec = TypeCodeCodec::new();
        let mut rng = fastrand::Rng::with_seed(0x5553_52);
        for _ in 0..2000 {
            let len = rng.usize(0..128);
            let mut blob: Vec<u8> = (0..len).map(|_| rng.u8(..)).collect();
            if len > 3 && rng.bool() {
                blob[..3].copy_from_slice(USER_DATA_MAGIC);
                if len > HEADER_LEN {
                    blob[EXTENSIBILITY_OFFSET] = rng.u8(0..3);
                    blob[HEADER_LEN] = rng.u8(0..32);
                }
            }
            let _ = parse_user_data(&blob, &codec);
        }
    }
}
