use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// (De)serialize a [`SnowflakeId`] as its native integer.
///
/// ```
/// use flakeid::{SnowflakeId, as_native_snow};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "as_native_snow")]
///     id: SnowflakeId,
/// }
/// ```
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub mod as_native_snow {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::{ParseIdError, SnowflakeId};

    /// Serialize a snowflake id as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize a snowflake id from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the reserved
    /// high bit is set.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = SnowflakeId::from_raw(u64::deserialize(d)?);
        if !id.is_valid() {
            return Err(serde::de::Error::custom(ParseIdError::ReservedBitSet {
                id: id.to_raw(),
            }));
        }
        Ok(id)
    }
}

/// (De)serialize a [`SnowflakeId`] as a decimal string.
///
/// JavaScript numbers lose precision above 2^53, so JSON consumed by browsers
/// should carry ids as strings. Deserialization also accepts a bare integer
/// for lenient clients.
///
/// ```
/// use flakeid::{SnowflakeId, as_string_snow};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "as_string_snow")]
///     id: SnowflakeId,
/// }
///
/// let row = Row { id: SnowflakeId::from_raw(9_007_199_254_740_993) };
/// assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"id":"9007199254740993"}"#);
/// ```
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub mod as_string_snow {
    use core::fmt;

    use super::{Deserializer, Serializer};
    use crate::{ParseIdError, SnowflakeId};

    /// Serialize a snowflake id as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize a snowflake id from a decimal string or an integer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a base-10 `u64`
    /// - The reserved high bit is set
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a decimal snowflake id string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let id = SnowflakeId::from_raw(v);
                if !id.is_valid() {
                    return Err(serde::de::Error::custom(ParseIdError::ReservedBitSet {
                        id: v,
                    }));
                }
                Ok(id)
            }
        }

        d.deserialize_any(DecimalVisitor)
    }
}
