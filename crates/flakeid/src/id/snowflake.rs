use core::{fmt, str::FromStr, time::Duration};

use crate::{
    error::ParseIdError,
    id::{MAX_SEQUENCE, MAX_TIMESTAMP, MAX_WORKER_ID, decode_id, encode_id},
};

/// A 64-bit Snowflake id.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 10 bits worker ID
/// - 12 bits sequence
///
/// Ordering follows the raw integer, which orders by timestamp, then worker,
/// then sequence.
///
/// `Display` renders the decimal integer. Use it (or
/// [`SnowflakeId::to_padded_string`]) wherever a consumer cannot hold a 64-bit
/// integer exactly, such as JSON read by JavaScript.
///
/// # Example
///
/// ```
/// use flakeid::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.worker_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// assert_eq!(id.to_string(), id.to_raw().to_string());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// The smallest id.
    pub const MIN: Self = Self { id: 0 };

    /// The largest id the layout can express.
    pub const MAX: Self = Self::from_components(MAX_TIMESTAMP, MAX_WORKER_ID, MAX_SEQUENCE);

    /// Packs the three components into an id.
    #[must_use]
    pub const fn from_components(timestamp: u64, worker_id: u16, sequence: u16) -> Self {
        Self {
            id: encode_id(timestamp, worker_id, sequence),
        }
    }

    /// Wraps a raw integer without validation.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    /// Returns the raw integer.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp offset (ms since the epoch).
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        decode_id(self.id).0
    }

    /// Extracts the worker id.
    #[must_use]
    pub const fn worker_id(&self) -> u16 {
        decode_id(self.id).1
    }

    /// Extracts the sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u16 {
        decode_id(self.id).2
    }

    /// Returns the `(timestamp, worker_id, sequence)` triple.
    #[must_use]
    pub const fn components(&self) -> (u64, u16, u16) {
        decode_id(self.id)
    }

    /// Returns `true` when the reserved high bit is clear.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.id >> 63 == 0
    }

    /// Absolute issue time in milliseconds since the Unix epoch, given the
    /// epoch the issuing generator was configured with.
    ///
    /// ```
    /// use flakeid::{DEFAULT_EPOCH, SnowflakeId};
    ///
    /// let id = SnowflakeId::from_components(5, 0, 0);
    /// assert_eq!(id.unix_millis(DEFAULT_EPOCH), 1_704_067_200_005);
    /// ```
    #[must_use]
    pub const fn unix_millis(&self, epoch: Duration) -> u64 {
        let epoch_ms = epoch.as_millis();
        let epoch_ms = if epoch_ms > u64::MAX as u128 {
            u64::MAX
        } else {
            epoch_ms as u64
        };
        epoch_ms.saturating_add(self.timestamp())
    }

    /// Returns the id as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexicographically in the same order as the ids.
    #[must_use]
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for SnowflakeId {
    fn from(id: u64) -> Self {
        Self::from_raw(id)
    }
}

impl FromStr for SnowflakeId {
    type Err = ParseIdError;

    /// Parses a decimal id, padded or not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self::from_raw(s.parse::<u64>()?);
        if !id.is_valid() {
            return Err(ParseIdError::ReservedBitSet { id: id.to_raw() });
        }
        Ok(id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (timestamp, worker_id, sequence) = self.components();
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &timestamp)
            .field("worker_id", &worker_id)
            .field("sequence", &sequence)
            .finish()
    }
}
