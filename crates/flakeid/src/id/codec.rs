//! Bit packing for ids and for the generator's internal state word.
//!
//! ```text
//!  Bit Index:  63           63 62            22 21            12 11             0
//!              +--------------+----------------+----------------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | worker ID (10) | sequence (12) |
//!              +--------------+----------------+----------------+---------------+
//!              |<----------- MSB ---------- 64 bits ---------- LSB ------------>|
//! ```
//!
//! The state word uses the same packing with the worker id removed, i.e. the
//! timestamp sits directly above the sequence in the low 53 bits.

/// Width of the timestamp offset field.
pub const TIMESTAMP_BITS: u32 = 41;

/// Width of the worker id field.
pub const WORKER_ID_BITS: u32 = 10;

/// Width of the sequence field.
pub const SEQUENCE_BITS: u32 = 12;

/// Bitmask for the 41-bit timestamp field (after shifting).
pub const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;

/// Bitmask for the 10-bit worker id field (after shifting).
pub const WORKER_ID_MASK: u64 = (1 << WORKER_ID_BITS) - 1;

/// Bitmask for the 12-bit sequence field.
pub const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// Shift of the worker id field (bit 12).
pub const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;

/// Shift of the timestamp field (bit 22).
pub const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;

/// Largest timestamp offset representable, roughly 69 years of milliseconds.
pub const MAX_TIMESTAMP: u64 = TIMESTAMP_MASK;

/// Largest valid worker id (1023).
pub const MAX_WORKER_ID: u16 = WORKER_ID_MASK as u16;

/// Largest sequence value within one millisecond (4095).
pub const MAX_SEQUENCE: u16 = SEQUENCE_MASK as u16;

/// Packs the three id fields into a 64-bit id.
///
/// Field ranges are only checked in debug builds. Passing out-of-range values
/// is a caller bug; in release builds the excess bits are masked off.
///
/// # Example
/// ```
/// use flakeid::{decode_id, encode_id};
///
/// let id = encode_id(1_000, 7, 3);
/// assert_eq!(decode_id(id), (1_000, 7, 3));
/// ```
#[inline]
#[must_use]
pub const fn encode_id(timestamp: u64, worker_id: u16, sequence: u16) -> u64 {
    debug_assert!(timestamp <= TIMESTAMP_MASK, "timestamp overflow");
    debug_assert!(worker_id <= MAX_WORKER_ID, "worker_id overflow");
    debug_assert!(sequence <= MAX_SEQUENCE, "sequence overflow");
    ((timestamp & TIMESTAMP_MASK) << TIMESTAMP_SHIFT)
        | ((worker_id as u64 & WORKER_ID_MASK) << WORKER_ID_SHIFT)
        | (sequence as u64 & SEQUENCE_MASK)
}

/// Splits an id into `(timestamp, worker_id, sequence)`.
#[inline]
#[must_use]
pub const fn decode_id(id: u64) -> (u64, u16, u16) {
    (
        (id >> TIMESTAMP_SHIFT) & TIMESTAMP_MASK,
        ((id >> WORKER_ID_SHIFT) & WORKER_ID_MASK) as u16,
        (id & SEQUENCE_MASK) as u16,
    )
}

/// Diagnostic decoding of an id into `(timestamp, worker_id, sequence)`.
///
/// Same as [`decode_id`]; never needed on the issuing path.
#[inline]
#[must_use]
pub const fn decode(id: u64) -> (u64, u16, u16) {
    decode_id(id)
}

/// Packs `(timestamp, sequence)` into a generator state word.
#[inline]
#[must_use]
pub const fn encode_state(timestamp: u64, sequence: u16) -> u64 {
    debug_assert!(timestamp <= TIMESTAMP_MASK, "timestamp overflow");
    debug_assert!(sequence <= MAX_SEQUENCE, "sequence overflow");
    ((timestamp & TIMESTAMP_MASK) << SEQUENCE_BITS) | (sequence as u64 & SEQUENCE_MASK)
}

/// Splits a generator state word into `(timestamp, sequence)`.
#[inline]
#[must_use]
pub const fn decode_state(word: u64) -> (u64, u16) {
    (
        (word >> SEQUENCE_BITS) & TIMESTAMP_MASK,
        (word & SEQUENCE_MASK) as u16,
    )
}
