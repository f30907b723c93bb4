use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("item#{_0}")]
pub struct ItemId(u64);

crate::impl_id_newtype!(ItemId);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemLabel(String);

crate::impl_string_newtype!(ItemLabel);

/// Opaque reference to a host-side object swallowed into a named part.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ContentId(String);

crate::impl_string_newtype!(ContentId);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextPart {
    pub text: String,
    pub domain: Option<String>,
}

impl TextPart {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            domain: None,
        }
    }

    pub fn translatable(domain: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            domain: Some(domain.into()),
        }
    }
}
