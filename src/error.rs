// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

use crate::types::Shape;

#[derive(Debug, Error)]
pub enum OverflowError {
    #[error("Expected struct, got {shape}")]
    NotAStruct { shape: Shape },
    #[error("Overflow field `{field}` is emitted as a named field; mark it #[serde(skip)]")]
    WrongOverflowType { field: &'static str },
    #[error("JSON parse error: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("JSON serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Named field present in overflow: '{key}'")]
    AliasedField { key: SmolStr },
}

pub type Result<T> = std::result::Result<T, OverflowError>;
