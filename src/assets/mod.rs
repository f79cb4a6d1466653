//! Photo sources, mask blending, and per-slot buffer preparation.
//!
//! All IO happens here, before the first frame is composed. Renderers only read the prepared
//! [`photo::PhotoStore`].

pub(crate) mod photo;
pub(crate) mod scan;
pub(crate) mod source;
