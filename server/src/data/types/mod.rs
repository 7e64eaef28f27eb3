//! Shared data types returned by the data layer

mod records;

pub use records::{
    AdminUserRow, ListingRow, OwnerSummary, PageResult, ReviewRow, ReviewerSummary, TeamRow,
    UserRow,
};
