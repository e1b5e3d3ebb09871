// Capa de mapa: ciclo de vida de marcadores independiente de plataforma + renderers por plataforma

#[cfg(target_arch = "wasm32")]
pub mod web;

pub mod markers;
pub mod traits;

pub use markers::MarkerLayer;
pub use traits::{CameraTarget, Coordinates, MapError, MapRenderer, OpportunityMarker};
