// ============================================================================
// MAPBOX FFI - Foreign Function Interface hacia el shell JS del mapa
// ============================================================================
// Wrappers finos sobre funciones JS globales. Sin estado, sin lógica.
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = initMapbox)]
    pub fn init_mapbox(container_id: &str, access_token: &str, center_lng: f64, center_lat: f64, zoom: f64);

    /// Marker JSON: { id, title, organization, coords: [lng, lat] }
    #[wasm_bindgen(js_name = addOpportunityMarker)]
    pub fn add_opportunity_marker(marker_json: &str);

    #[wasm_bindgen(js_name = removeOpportunityMarker)]
    pub fn remove_opportunity_marker(opportunity_id: &str);

    #[wasm_bindgen(js_name = flyToLocation)]
    pub fn fly_to_location(lng: f64, lat: f64, zoom: f64, duration_ms: u32);

    #[wasm_bindgen(js_name = easeToLocation)]
    pub fn ease_to_location(lng: f64, lat: f64);
}
