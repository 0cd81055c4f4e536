pub mod experience;
pub mod project;
pub mod site_content;
pub mod social;
pub mod user;

pub use experience::*;
pub use project::*;
pub use site_content::*;
pub use social::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Columns the backend may return as `null` decode to their default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank optional text becomes `None`
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
