//! Encoding of typed queue items into opaque store payloads

use crate::error::StoreError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a value into a payload the store can hold
pub fn encode<T: Serialize>(value: &T) -> Result<Bytes, StoreError> {
    let encoded = serde_json::to_vec(value)?;
    Ok(Bytes::from(encoded))
}

/// Decode a payload previously produced by [`encode`]
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, StoreError> {
    serde_json::from_slice(payload).map_err(|e| {
        StoreError::Codec(format!(
            "cannot decode {} byte payload as {}: {}",
            payload.len(),
            std::any::type_name::<T>(),
            e
        ))
    })
}
