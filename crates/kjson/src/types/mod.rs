//! The extended kJSON value types: big integers, decimals, instants, and
//! durations.
//!
//! Each type owns its invariants (canonical digit strings, nano ranges,
//! sign-of-zero) and its canonical text, so the text emitter and the
//! binary codec both delegate rendering here. UUIDs need no wrapper; the
//! [`uuid`] crate's type already matches the RFC 4122 byte contract.

mod bigint;
mod decimal;
mod duration;
mod instant;

pub use bigint::BigInt;
pub use decimal::Decimal128;
pub use duration::Duration;
pub use instant::Instant;

/// Generates a random (version 4) UUID.
#[must_use]
pub fn uuid_v4() -> uuid::Uuid {
    uuid::Uuid::new_v4()
}

/// Generates a timestamp-ordered (version 7) UUID.
#[must_use]
pub fn uuid_v7() -> uuid::Uuid {
    uuid::Uuid::now_v7()
}
