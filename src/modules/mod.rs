//! Modules layer - Infrastructure components shared by features
//!
//! Contains the catalog query layer (persistence boundary) and the
//! object storage client used for image uploads.

pub mod catalog;
pub mod storage;
