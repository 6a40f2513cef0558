use std::fmt::Display;
use std::str::FromStr;

use crate::error::TaskError;

/// Converts logical keys to and from their internal stored form.
pub trait KeyCodec<K>: Send + Sync {
    fn encode(&self, key: &K) -> String;

    fn decode(&self, raw: &str) -> Result<K, TaskError>;
}

/// Codec for any key with a `ToString`/`FromStr` round trip.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringKeyCodec;

impl<K> KeyCodec<K> for StringKeyCodec
where
    K: ToString + FromStr,
    <K as FromStr>::Err: Display,
{
    fn encode(&self, key: &K) -> String {
        key.to_string()
    }

    fn decode(&self, raw: &str) -> Result<K, TaskError> {
        raw.parse().map_err(|e: <K as FromStr>::Err| TaskError::KeyDecode {
            key: raw.to_string(),
            reason: e.to_string(),
        })
    }
}
