//! Low-level primitives and utilities
//!
//! This module contains text position utilities shared by the diagnostics
//! pipeline.

pub mod line_table;
