//! movconv - batch H.265 to H.264 conversion
//!
//! This library crate exposes the batch driver and single-file converter for
//! integration testing.

pub mod batch;
pub mod convert;
pub mod naming;
