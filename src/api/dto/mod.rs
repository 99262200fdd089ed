//! Data Transfer Objects for read-view request/response serialization.

pub mod reading_dto;

pub use reading_dto::*;
