//! Feature slices

pub mod svfir;
