//! Read-only projections returned by the search operations.

pub mod member;
