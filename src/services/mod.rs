pub mod favorites_service;
pub mod geocoding_service;
pub mod search_service;

// Implementaciones HTTP de los traits de servicio (solo build web)
#[cfg(target_arch = "wasm32")]
pub mod api_client;

#[cfg(target_arch = "wasm32")]
pub use api_client::ApiClient;
pub use favorites_service::*;
pub use geocoding_service::*;
pub use search_service::*;
