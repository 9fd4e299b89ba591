use crate::{error::ClockRollback, id::SnowflakeId};

/// A minimal interface for generating Snowflake ids.
///
/// Implemented by every concurrency strategy so callers (and tests) can be
/// written once against either.
pub trait IdGenerator {
    /// The immutable worker id encoded into every id.
    fn worker_id(&self) -> u16;

    /// Generates the next id as a [`SnowflakeId`].
    ///
    /// # Errors
    ///
    /// Returns [`ClockRollback`] when the clock moved backwards further than
    /// the generator can absorb.
    fn next_snowflake(&self) -> Result<SnowflakeId, ClockRollback>;

    /// Generates the next id as a raw integer.
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::next_snowflake`].
    fn next_id(&self) -> Result<u64, ClockRollback> {
        self.next_snowflake().map(|id| id.to_raw())
    }

    /// Generates the next id rendered as a decimal string.
    ///
    /// Use this for JSON payloads or URL segments consumed by runtimes without
    /// exact 64-bit integers.
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::next_snowflake`].
    fn next_id_string(&self) -> Result<String, ClockRollback> {
        self.next_snowflake().map(|id| id.to_string())
    }
}
