use crate::utils::mapbox_ffi;
use super::{CameraTarget, Coordinates, MapError, MapRenderer, OpportunityMarker};

/// Renderer del mapa para la build web, sobre Mapbox GL JS
pub struct WebMapRenderer {
    is_ready: bool,
}

impl WebMapRenderer {
    pub fn new() -> Self {
        Self { is_ready: false }
    }

    /// Crear el mapa Mapbox dentro de `container_id`
    pub fn initialize(&mut self, container_id: &str, access_token: &str, center: Coordinates, zoom: f64) {
        log::info!("🗺️ Inicializando Mapbox GL JS...");
        mapbox_ffi::init_mapbox(container_id, access_token, center.longitude, center.latitude, zoom);
        self.is_ready = true;
        log::info!("✅ Mapa web inicializado");
    }
}

impl Default for WebMapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer for WebMapRenderer {
    fn add_opportunity_marker(&mut self, marker: &OpportunityMarker) -> Result<(), MapError> {
        if !self.is_ready {
            return Err(MapError::NotReady);
        }
        let json = serde_json::to_string(marker).map_err(|e| MapError::Unknown(e.to_string()))?;
        mapbox_ffi::add_opportunity_marker(&json);
        Ok(())
    }

    fn remove_opportunity_marker(&mut self, opportunity_id: i64) -> Result<(), MapError> {
        if !self.is_ready {
            return Err(MapError::NotReady);
        }
        mapbox_ffi::remove_opportunity_marker(&opportunity_id.to_string());
        Ok(())
    }

    fn fly_to(&mut self, target: CameraTarget) -> Result<(), MapError> {
        if !self.is_ready {
            return Err(MapError::NotReady);
        }
        log::info!("🎯 Volando a ({}, {}) zoom {}",
                   target.center.latitude, target.center.longitude, target.zoom);
        mapbox_ffi::fly_to_location(target.center.longitude, target.center.latitude, target.zoom, target.duration_ms);
        Ok(())
    }

    fn ease_to(&mut self, coordinates: Coordinates) -> Result<(), MapError> {
        if !self.is_ready {
            return Err(MapError::NotReady);
        }
        mapbox_ffi::ease_to_location(coordinates.longitude, coordinates.latitude);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.is_ready
    }
}
