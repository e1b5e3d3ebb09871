// ============================================================================
// SEARCH VIEWMODEL - Búsqueda de ubicación -> cámara del mapa + pipeline de búsqueda
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::MapConfig;
use crate::error::AppError;
use crate::maps::{CameraTarget, Coordinates, MapRenderer, MarkerLayer};
use crate::models::{SearchOutcome, SearchRequest};
use crate::services::{LocationSelection, OpportunitySource, SearchService};
use crate::state::OpportunityStore;

pub struct SearchViewModel<S: OpportunitySource, R: MapRenderer> {
    service: SearchService<S>,
    store: OpportunityStore,
    markers: Rc<MarkerLayer<R>>,
    map_config: MapConfig,
    last_location: RefCell<Option<LocationSelection>>,
}

impl<S: OpportunitySource, R: MapRenderer> SearchViewModel<S, R> {
    pub fn new(
        service: SearchService<S>,
        store: OpportunityStore,
        markers: Rc<MarkerLayer<R>>,
        map_config: MapConfig,
    ) -> Self {
        Self {
            service,
            store,
            markers,
            map_config,
            last_location: RefCell::new(None),
        }
    }

    pub fn store(&self) -> &OpportunityStore {
        &self.store
    }

    pub fn markers(&self) -> &Rc<MarkerLayer<R>> {
        &self.markers
    }

    /// Nueva sesión de búsqueda para la ubicación elegida con el radio actual.
    /// Reemplaza cualquier búsqueda en curso.
    pub async fn search_location(&self, location: LocationSelection) -> Result<SearchOutcome, AppError> {
        let target = CameraTarget {
            center: Coordinates {
                longitude: location.longitude,
                latitude: location.latitude,
            },
            zoom: self.map_config.search_zoom,
            duration_ms: self.map_config.fly_duration_ms,
        };
        if let Err(e) = self.markers.fly_to(target) {
            log::warn!("⚠️ Cámara no movida: {}", e);
        }

        let request = SearchRequest::new(
            location.latitude,
            location.longitude,
            location.postal_code.clone(),
            self.store.get_max_distance_km(),
        );
        *self.last_location.borrow_mut() = Some(location);
        self.service.run(&self.store, &self.markers, &request).await
    }

    /// Repetir la última ubicación (cambio de radio o "reintentar")
    pub async fn refresh(&self) -> Result<SearchOutcome, AppError> {
        let location = self
            .last_location
            .borrow()
            .clone()
            .ok_or_else(|| AppError::Validation("Search for a location first".to_string()))?;
        let request = SearchRequest::new(
            location.latitude,
            location.longitude,
            location.postal_code,
            self.store.get_max_distance_km(),
        );
        self.service.run(&self.store, &self.markers, &request).await
    }

    pub fn has_location(&self) -> bool {
        self.last_location.borrow().is_some()
    }

    /// Slider de radio. Devuelve el valor guardado; quien llama decide si refrescar.
    pub fn set_max_distance_km(&self, value: u32) -> u32 {
        self.store.set_max_distance_km(value)
    }

    /// Clic en marcador
    pub fn select_marker(&self, opportunity_id: i64) -> bool {
        let selected = self.store.select_by_id(opportunity_id);
        if !selected {
            log::warn!("⚠️ El marcador {} no tiene oportunidad en la lista actual", opportunity_id);
        }
        selected
    }

    /// Mantener visible la oportunidad seleccionada
    pub fn focus_selected(&self) {
        if let Some(selected) = self.store.get_selected_opportunity() {
            if let Err(e) = self.markers.focus(&selected) {
                log::warn!("⚠️ No se pudo enfocar la oportunidad {}: {}", selected.id, e);
            }
        }
    }
}
