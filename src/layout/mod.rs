//! Grid planning and slot assignment.

pub(crate) mod grid;
