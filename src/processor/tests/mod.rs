//! Pipeline tests for the table builder
//!
//! Exercise the full parse path over small CSV uploads shaped like real
//! exports: title rows, section labels, blank spacer rows and columns.

pub mod overrides;
