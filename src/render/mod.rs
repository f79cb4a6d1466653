//! CPU frame composition.

pub(crate) mod compositor;
pub(crate) mod raster;
