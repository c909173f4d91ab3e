//! # Wirebox Support
//!
//! Shared utilities for the Wirebox DI framework.
//!
//! This crate provides:
//! - Type-name shortening for factory names
//! - "Did you mean?" suggestions for lookup misses
//! - Registry listings

pub mod rendering;
