use crate::deserialization::from_str;
use crate::locate::OverflowFields;
use crate::serialization::to_map;
use crate::types::RawJson;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

// ─── Lossless Wrapper ───────────────────────────────────────────────────────

/// Wraps a record so its own `Serialize`/`Deserialize` go through the
/// overflow codec.
///
/// This lets a record keep its unknown keys while nested inside other serde
/// types. Deserialization captures the value as a raw JSON span first, so it
/// only works with `serde_json` deserializers.
///
/// ```
/// use overflow_json::{Lossless, OverflowFields, OverflowMap};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct PetData {
///     name: String,
///     #[serde(skip)]
///     overflow: OverflowMap,
/// }
/// # impl OverflowFields for PetData {
/// #     fn overflow(&self) -> &OverflowMap { &self.overflow }
/// #     fn overflow_mut(&mut self) -> &mut OverflowMap { &mut self.overflow }
/// # }
///
/// let input = r#"[{"legs":4,"name":"Rex"},{"name":"Nemo","fins":2}]"#;
/// let pets: Vec<Lossless<PetData>> = serde_json::from_str(input).unwrap();
/// assert_eq!(pets[1].name, "Nemo");
/// assert_eq!(
///     serde_json::to_string(&pets).unwrap(),
///     r#"[{"legs":4,"name":"Rex"},{"fins":2,"name":"Nemo"}]"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lossless<T>(pub T);

impl<T> Lossless<T> {
    #[inline]
    pub fn new(record: T) -> Self {
        Lossless(record)
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Lossless<T> {
    #[inline]
    fn from(record: T) -> Self {
        Lossless(record)
    }
}

impl<T> Deref for Lossless<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Lossless<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: OverflowFields> Serialize for Lossless<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_map(&self.0)
            .map_err(<S::Error as ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Lossless<T>
where
    T: OverflowFields + DeserializeOwned + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawJson::deserialize(deserializer)?;
        from_str(raw.get()).map(Lossless).map_err(<D::Error as de::Error>::custom)
    }
}
