use serde::{Deserialize, Serialize};

/// A descriptor field that is either declared literally or inherited from a
/// shared version provider.
///
/// In TOML the literal form is the bare value (`min-sdk = 23`) and the
/// inherited form is an inline table (`version-code = { inherit = "flutter.versionCode" }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inherited<T> {
    Value(T),
    Inherit { inherit: String },
}

impl<T> Inherited<T> {
    /// Build an inherited field pointing at the given provider key.
    pub fn inherit(key: impl Into<String>) -> Self {
        Self::Inherit {
            inherit: key.into(),
        }
    }

    /// The literal value, if this field is not inherited.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Inherit { .. } => None,
        }
    }

    /// The provider key, if this field is inherited.
    pub fn inherit_key(&self) -> Option<&str> {
        match self {
            Self::Value(_) => None,
            Self::Inherit { inherit } => Some(inherit),
        }
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Self::Inherit { .. })
    }
}

impl<T> From<T> for Inherited<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}
