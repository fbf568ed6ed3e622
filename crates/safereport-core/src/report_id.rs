//! Public report identifiers.
//!
//! A report id is the 16-character token a submitter keeps to look their
//! report up later. It is distinct from the store's internal primary key.
//!
//! The token is 16 lowercase hex characters drawn from 8 bytes of OS
//! randomness. Ids are not guaranteed unique: the store holds a UNIQUE
//! constraint on the column and intake reports a collision as a conflict.

use rand_core::{OsRng, RngCore};

/// Length of every generated report id, in characters.
pub const REPORT_ID_LEN: usize = 16;

/// Mint a fresh public report id.
pub fn generate() -> String { generate_with(&mut OsRng) }

/// Mint a report id from the given random source.
pub fn generate_with(rng: &mut impl RngCore) -> String {
  let mut bytes = [0u8; REPORT_ID_LEN / 2];
  rng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}
