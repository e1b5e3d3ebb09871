use serde::{Deserialize, Serialize};
use crate::error::AppError;
use crate::utils::constants::{DEFAULT_MAX_DISTANCE_KM, DEFAULT_MAX_SEARCH_PAGES, OPPORTUNITIES_API_URL};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub opportunities_api_url: String,
    /// Backend de favoritos. Vacío = favoritos remotos desactivados.
    pub backend_api_url: String,
    pub mapbox_access_token: String,
    pub enable_logging: bool,
    pub search_config: SearchConfig,
    pub map_config: MapConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            opportunities_api_url: OPPORTUNITIES_API_URL.to_string(),
            backend_api_url: String::new(),
            mapbox_access_token: String::new(),
            enable_logging: true,
            search_config: SearchConfig::default(),
            map_config: MapConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_max_distance_km: u32,
    /// Máximo de enlaces `next` seguidos por búsqueda
    pub max_pages: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            max_pages: DEFAULT_MAX_SEARCH_PAGES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_zoom: f64,
    /// Zoom al volar hacia una ubicación buscada
    pub search_zoom: f64,
    pub fly_duration_ms: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        // Calgary, AB
        Self {
            default_center_lat: 51.0447,
            default_center_lng: -114.0719,
            default_zoom: 12.0,
            search_zoom: 14.0,
            fly_duration_ms: 2000,
        }
    }
}

impl AppConfig {
    /// Cargar configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            opportunities_api_url: option_env!("OPPORTUNITIES_API_URL")
                .map(trim_trailing_slash)
                .unwrap_or(defaults.opportunities_api_url),
            backend_api_url: option_env!("BACKEND_API_URL")
                .map(trim_trailing_slash)
                .unwrap_or_default(),
            mapbox_access_token: option_env!("MAPBOX_ACCESS_TOKEN")
                .unwrap_or("").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            search_config: SearchConfig {
                default_max_distance_km: option_env!("DEFAULT_MAX_DISTANCE_KM")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_DISTANCE_KM),
                max_pages: option_env!("MAX_SEARCH_PAGES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_SEARCH_PAGES),
            },
            map_config: MapConfig {
                default_center_lat: option_env!("DEFAULT_MAP_CENTER_LAT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lat),
                default_center_lng: option_env!("DEFAULT_MAP_CENTER_LNG")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lng),
                default_zoom: option_env!("DEFAULT_MAP_ZOOM")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_zoom),
                ..defaults.map_config
            },
        }
    }

    /// URL base del backend, o error de configuración si lo remoto está desactivado
    pub fn backend_url(&self) -> Result<&str, AppError> {
        if self.backend_api_url.is_empty() {
            return Err(AppError::Config(
                "BACKEND_API_URL is not configured. Set it before signing in.".to_string(),
            ));
        }
        Ok(&self.backend_api_url)
    }

    pub fn has_backend_configured(&self) -> bool {
        !self.backend_api_url.is_empty()
    }

    pub fn mapbox_token(&self) -> Result<&str, AppError> {
        if self.mapbox_access_token.is_empty() {
            return Err(AppError::Config("MAPBOX_ACCESS_TOKEN is not configured".to_string()));
        }
        Ok(&self.mapbox_access_token)
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

fn trim_trailing_slash(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_backend_is_a_config_error() {
        let config = AppConfig::default();
        assert!(!config.has_backend_configured());
        assert!(matches!(config.backend_url(), Err(AppError::Config(_))));
    }

    #[test]
    fn configured_backend_is_returned() {
        let config = AppConfig {
            backend_api_url: "https://api.voluntr.app".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.backend_url().unwrap(), "https://api.voluntr.app");
    }

    #[test]
    fn trailing_slashes_are_dropped() {
        assert_eq!(trim_trailing_slash("https://api.voluntr.app//"), "https://api.voluntr.app");
    }

    #[test]
    fn defaults_match_search_ui() {
        let config = AppConfig::default();
        assert_eq!(config.search_config.default_max_distance_km, 25);
        assert!(config.search_config.max_pages > 0);
    }
}
