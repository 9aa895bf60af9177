//! Search and pagination over members and their optional teams.
//!
//! Optional criteria are composed into a conjunctive filter over
//! `members LEFT JOIN teams`; results come back either in full or as a
//! [`pagination::Page`] whose total is determined by one of the
//! [`pagination::PaginationStrategy`] variants.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;
