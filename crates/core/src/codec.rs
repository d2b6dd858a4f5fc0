//! Serialization of the automatic shadow set to a flat string blob.
//!
//! The blob is a JSON object mapping slot index to item identity
//! (`{"3":995}`), the format the original client stored. The codec is a
//! pure string transform; the empty-set ⇒ no-stored-value convention and
//! the fail-open load policy live with the persistence caller.

use crate::state::ShadowSet;

/// Errors raised while encoding or decoding a shadow blob.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed shadow blob: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serializes a shadow set to its storage blob.
pub fn encode_shadows(shadows: &ShadowSet) -> Result<String, CodecError> {
    Ok(serde_json::to_string(shadows)?)
}

/// Parses a storage blob back into a shadow set.
pub fn decode_shadows(blob: &str) -> Result<ShadowSet, CodecError> {
    Ok(serde_json::from_str(blob)?)
}
