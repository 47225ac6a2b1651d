pub mod booking;
pub mod health;
pub mod pet;
pub mod user_app;

use serde::{Deserialize, Deserializer};

/// Reads a `null` column as the type default (`[]`, `""`, ...)
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
