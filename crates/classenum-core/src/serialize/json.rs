use crate::serialize::SerializeError;
use serde::de::DeserializeOwned;
use serde_json::from_str;

/// Deserialize a JSON string into a value.
///
/// Input size is bounded before decode; stored enum values are short, so an
/// oversized slot is treated as foreign data rather than parsed.
pub(super) fn deserialize<T>(text: &str, max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    if text.len() > max_bytes {
        return Err(SerializeError::SizeLimitExceeded {
            len: text.len(),
            max_bytes,
        });
    }

    from_str(text).map_err(|e| SerializeError::Malformed(e.to_string()))
}
