//! Serde helpers for partial-update DTOs.

use serde::{Deserialize, Deserializer};

/// Deserialize a present field into `Some(value)`, keeping JSON `null` as
/// `Some(None)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`:
///
/// ```
/// use caretrack_core::patch::deserialize_present;
///
/// #[derive(serde::Deserialize)]
/// struct Patch {
///     #[serde(default, deserialize_with = "deserialize_present")]
///     notes: Option<Option<String>>,
/// }
///
/// let absent: Patch = serde_json::from_str("{}").unwrap();
/// assert_eq!(absent.notes, None);
/// let cleared: Patch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
/// assert_eq!(cleared.notes, Some(None));
/// ```
pub fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
