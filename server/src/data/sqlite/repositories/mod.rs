//! SQLite repositories
//!
//! Types (ListingRow, UserRow, etc.) should be imported from `crate::data::types`.

pub mod listing;
mod query;
pub mod review;
pub mod team;
pub mod user;

#[cfg(test)]
pub(crate) mod fixtures;
