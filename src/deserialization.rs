use crate::error::{OverflowError, Result};
use crate::locate::{OverflowFields, locate};
use crate::types::OverflowMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use smol_str::SmolStr;
use std::collections::BTreeSet;

// ─── Generic Parse ──────────────────────────────────────────────────────────

/// Parse a JSON object into key → raw value pairs without interpreting values.
#[inline]
pub fn parse_object(bytes: &[u8]) -> Result<OverflowMap> {
    serde_json::from_slice(bytes).map_err(OverflowError::Parse)
}

/// The record's named fields as key → raw value pairs.
pub fn named_fields<T: Serialize + ?Sized>(record: &T) -> Result<OverflowMap> {
    let named = serde_json::to_vec(record).map_err(OverflowError::Serialize)?;
    parse_object(&named)
}

/// Keys the record's named fields produce when serialized.
///
/// Sourced from the record's own `Serialize` output, so renames and skipped
/// fields are accounted for exactly as the encoder will see them.
pub fn claimed_keys<T: Serialize + ?Sized>(record: &T) -> Result<BTreeSet<SmolStr>> {
    Ok(named_fields(record)?.into_keys().collect())
}

// ─── Decode ─────────────────────────────────────────────────────────────────

/// Decode `bytes` into `target`, keeping unknown keys in its overflow map.
///
/// Named fields present in `bytes` are decoded; named fields absent from it
/// keep the value `target` already holds. Every key the named fields do not
/// claim lands in the overflow map with its source bytes intact.
///
/// The record is rebuilt through its `Deserialize` impl, so any other
/// `#[serde(skip)]` field of `target` is reset to its default. Duplicate
/// input keys resolve to the last occurrence. On error `target` may be left
/// partially updated.
pub fn from_slice_into<T>(bytes: &[u8], target: &mut T) -> Result<()>
where
    T: OverflowFields + DeserializeOwned,
{
    locate(target)?.reset();

    let mut overflow = parse_object(bytes)?;

    // Current named values underneath, input entries on top.
    let mut merged = named_fields(&*target)?;
    merged.extend(overflow.iter().map(|(key, value)| (key.clone(), value.clone())));
    let merged = serde_json::to_vec(&merged).map_err(OverflowError::Serialize)?;
    *target = serde_json::from_slice(&merged).map_err(OverflowError::Parse)?;

    let claimed = claimed_keys(&*target)?;
    overflow.retain(|key, _| !claimed.contains(key));

    tracing::trace!(
        named = claimed.len(),
        overflow = overflow.len(),
        "decoded record with overflow"
    );
    *target.overflow_mut() = overflow;
    Ok(())
}

/// Decode `bytes` into a fresh `T`.
///
/// ```
/// # use overflow_json::{OverflowFields, OverflowMap};
/// # use serde::{Deserialize, Serialize};
/// #[derive(Default, Serialize, Deserialize)]
/// struct DogData {
///     name: String,
///     #[serde(skip)]
///     overflow: OverflowMap,
/// }
/// # impl OverflowFields for DogData {
/// #     fn overflow(&self) -> &OverflowMap { &self.overflow }
/// #     fn overflow_mut(&mut self) -> &mut OverflowMap { &mut self.overflow }
/// # }
///
/// let dog: DogData = overflow_json::from_slice(br#"{"age":2,"name":"Fido"}"#)?;
/// assert_eq!(format!("{} is {}", dog.name, dog.overflow["age"]), "Fido is 2");
/// # Ok::<_, overflow_json::OverflowError>(())
/// ```
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: OverflowFields + DeserializeOwned + Default,
{
    let mut record = T::default();
    from_slice_into(bytes, &mut record)?;
    Ok(record)
}

#[inline]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: OverflowFields + DeserializeOwned + Default,
{
    from_slice(s.as_bytes())
}
