//! Allocation rule for the `no_urut` ordinal of purchase requests.
//!
//! The ordinal is `max(existing) + 1`, starting at 1. The repository reads
//! the maximum and inserts in one transaction holding [`NO_URUT_LOCK_KEY`],
//! so two concurrent submissions never read the same maximum.

/// Key for `pg_advisory_xact_lock` serializing ordinal allocation.
///
/// Arbitrary but fixed; no other code in this service takes advisory locks.
pub const NO_URUT_LOCK_KEY: i64 = 0x6e6f_5f75_7275_74;

/// How many times an insert is attempted when the unique constraint on
/// `no_urut` rejects it.
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 3;

/// The ordinal following `current_max`, or 1 when nothing has been allocated.
pub fn next_ordinal(current_max: Option<i64>) -> i64 {
    current_max.map_or(1, |max| max + 1)
}
