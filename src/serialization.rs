use crate::deserialization::named_fields;
use crate::error::{OverflowError, Result};
use crate::locate::{OverflowFields, overflow_of};
use crate::types::OverflowMap;
use std::io;

// ─── Merge ──────────────────────────────────────────────────────────────────

/// Named fields of `record` merged with its overflow map.
///
/// Fails with [`OverflowError::AliasedField`] on the first overflow key that
/// a named field also produces. Neither side takes precedence.
pub fn to_map<T: OverflowFields + ?Sized>(record: &T) -> Result<OverflowMap> {
    // Validate before serializing so a non-struct reports as such.
    let overflow = overflow_of(record)?;

    let mut result = named_fields(record)?;
    let named_count = result.len();

    for (key, value) in overflow {
        if result.contains_key(key) {
            return Err(OverflowError::AliasedField { key: key.clone() });
        }
        result.insert(key.clone(), value.clone());
    }

    tracing::trace!(
        named = named_count,
        overflow = overflow.len(),
        "merged record with overflow"
    );
    Ok(result)
}

// ─── Encode ─────────────────────────────────────────────────────────────────

/// Encode `record` with its overflow keys to JSON bytes.
///
/// ```
/// # use overflow_json::{OverflowFields, OverflowMap};
/// # use serde::{Deserialize, Serialize};
/// # use serde_json::value::RawValue;
/// #[derive(Default, Serialize, Deserialize)]
/// struct CatData {
///     name: String,
///     #[serde(skip)]
///     overflow: OverflowMap,
/// }
/// # impl OverflowFields for CatData {
/// #     fn overflow(&self) -> &OverflowMap { &self.overflow }
/// #     fn overflow_mut(&mut self) -> &mut OverflowMap { &mut self.overflow }
/// # }
///
/// let mut cat = CatData { name: "Tiddles".into(), ..Default::default() };
/// cat.overflow.insert("age".into(), RawValue::from_string("2".into()).unwrap());
///
/// let data = overflow_json::to_vec(&cat)?;
/// assert_eq!(data, br#"{"age":2,"name":"Tiddles"}"#);
/// # Ok::<_, overflow_json::OverflowError>(())
/// ```
pub fn to_vec<T: OverflowFields + ?Sized>(record: &T) -> Result<Vec<u8>> {
    let merged = to_map(record)?;
    serde_json::to_vec(&merged).map_err(OverflowError::Serialize)
}

pub fn to_string<T: OverflowFields + ?Sized>(record: &T) -> Result<String> {
    let merged = to_map(record)?;
    serde_json::to_string(&merged).map_err(OverflowError::Serialize)
}

/// Encode `record` into `writer`. Nothing is written if the merge fails.
pub fn to_writer<W, T>(writer: W, record: &T) -> Result<()>
where
    W: io::Write,
    T: OverflowFields + ?Sized,
{
    let merged = to_map(record)?;
    serde_json::to_writer(writer, &merged).map_err(OverflowError::Serialize)
}
