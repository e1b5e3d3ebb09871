// Utilidades compartidas

pub mod constants;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod mapbox_ffi;

pub use constants::*;
