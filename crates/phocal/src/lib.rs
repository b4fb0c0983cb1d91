#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use phocal_camera as camera;

#[doc(inline)]
pub use phocal_tiepoints as tiepoints;
