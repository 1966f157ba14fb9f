//! File format processors

pub mod xcstrings;
