//! Up-front planning: everything random is decided here, before the first frame.

pub(crate) mod mosaic;
pub(crate) mod summary;
