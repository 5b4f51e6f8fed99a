//! Crate-level scenario tests.

pub(crate) mod support;
