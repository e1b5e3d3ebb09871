// ============================================================================
// VOLUNTR - Núcleo de descubrimiento de oportunidades (Rust + WASM)
// ============================================================================
// Capas:
// - Models: payloads de la API y del backend
// - State: stores Rc<RefCell> con notificación de cambios
// - Services: pipeline de búsqueda, sync de favoritos, geocoding (+ cliente HTTP)
// - ViewModels: mazo de swipe, búsqueda, panel de favoritos
// - Maps: ciclo de vida de marcadores sobre un MapRenderer
// El shell web (app.rs + exports de abajo) solo se compila para wasm32.
// ============================================================================

pub mod config;
pub mod error;
pub mod maps;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_logger::Config;
    use crate::app::App;
    use crate::config::CONFIG;
    use crate::services::LocationSelection;

    // Instancia única de la app para los puntos de entrada exportados
    thread_local! {
        static APP: RefCell<Option<Rc<App>>> = RefCell::new(None);
    }

    fn with_app<T>(f: impl FnOnce(&Rc<App>) -> T) -> Option<T> {
        let app = APP.with(|cell| cell.borrow().clone());
        match app {
            Some(app) => Some(f(&app)),
            None => {
                log::warn!("⚠️ La app no está inicializada");
                None
            }
        }
    }

    fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
        serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
            log::error!("❌ Error de serialización: {}", e);
            JsValue::NULL
        })
    }

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        let level = if CONFIG.is_logging_enabled() {
            log::Level::Debug
        } else {
            log::Level::Warn
        };
        wasm_logger::init(Config::new(level));
        log::info!("🚀 Iniciando Voluntr");

        let app = App::new();
        APP.with(|cell| *cell.borrow_mut() = Some(app));
    }

    // ------------------------------------------------------------- search

    #[wasm_bindgen(js_name = onLocationQuery)]
    pub fn on_location_query(query: String) {
        with_app(|app| app.on_location_query(query));
    }

    #[wasm_bindgen(js_name = getSuggestions)]
    pub fn get_suggestions() -> JsValue {
        with_app(|app| to_js(&app.suggestions())).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = selectLocation)]
    pub fn select_location(candidate_id: String) -> bool {
        with_app(|app| app.select_location(&candidate_id)).unwrap_or(false)
    }

    /// Buscar un par de coordenadas (p. ej. geolocalización del navegador)
    #[wasm_bindgen(js_name = searchCoordinates)]
    pub fn search_coordinates(longitude: f64, latitude: f64, postal_code: Option<String>) {
        with_app(|app| {
            app.search_at(LocationSelection {
                place_name: String::new(),
                longitude,
                latitude,
                postal_code,
            })
        });
    }

    #[wasm_bindgen(js_name = retrySearch)]
    pub fn retry_search() {
        with_app(|app| app.retry_search());
    }

    #[wasm_bindgen(js_name = setMaxDistance)]
    pub fn set_max_distance(km: u32) -> u32 {
        with_app(|app| app.set_max_distance_km(km)).unwrap_or(km)
    }

    #[wasm_bindgen(js_name = setHideRemote)]
    pub fn set_hide_remote(hide: bool) {
        with_app(|app| app.set_hide_remote(hide));
    }

    #[wasm_bindgen(js_name = getSearchStatus)]
    pub fn get_search_status() -> JsValue {
        with_app(|app| to_js(&app.search_status())).unwrap_or(JsValue::NULL)
    }

    /// Lo llama el shell del mapa al hacer clic en un marcador
    #[wasm_bindgen(js_name = onMarkerClick)]
    pub fn on_marker_click(opportunity_id: f64) -> bool {
        with_app(|app| app.on_marker_click(opportunity_id as i64)).unwrap_or(false)
    }

    // -------------------------------------------------------------- swipe

    #[wasm_bindgen(js_name = getCurrentCard)]
    pub fn get_current_card() -> JsValue {
        with_app(|app| to_js(&app.current_card())).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = swipePointerDown)]
    pub fn swipe_pointer_down(x: f64) {
        with_app(|app| app.pointer_down(x));
    }

    #[wasm_bindgen(js_name = swipePointerMove)]
    pub fn swipe_pointer_move(x: f64) {
        with_app(|app| app.pointer_move(x));
    }

    #[wasm_bindgen(js_name = swipePointerUp)]
    pub fn swipe_pointer_up() {
        with_app(|app| app.pointer_up());
    }

    /// pointerleave / pointercancel en la carta
    #[wasm_bindgen(js_name = swipePointerCancel)]
    pub fn swipe_pointer_cancel() {
        with_app(|app| app.pointer_cancel());
    }

    #[wasm_bindgen(js_name = swipeSave)]
    pub fn swipe_save() {
        with_app(|app| app.save_current());
    }

    #[wasm_bindgen(js_name = swipeSkip)]
    pub fn swipe_skip() {
        with_app(|app| app.skip_current());
    }

    // ---------------------------------------------------------- favorites

    #[wasm_bindgen(js_name = getFavoritesPanel)]
    pub fn get_favorites_panel() -> JsValue {
        with_app(|app| to_js(&app.favorites_panel())).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = toggleFavorite)]
    pub fn toggle_favorite(opportunity_id: f64) -> bool {
        with_app(|app| app.toggle_favorite(opportunity_id as i64)).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = openFavorite)]
    pub fn open_favorite(opportunity_id: f64) -> bool {
        with_app(|app| app.open_favorite(opportunity_id as i64)).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = reloadFavorites)]
    pub fn reload_favorites() {
        with_app(|app| app.reload_favorites());
    }

    // --------------------------------------------------------------- auth

    /// El token viene del SDK JS del proveedor de auth
    #[wasm_bindgen(js_name = signIn)]
    pub fn sign_in(id_token: String) {
        with_app(|app| app.sign_in(id_token));
    }

    #[wasm_bindgen(js_name = signOut)]
    pub fn sign_out() {
        with_app(|app| app.sign_out());
    }

    #[wasm_bindgen(js_name = isSignedIn)]
    pub fn is_signed_in() -> bool {
        with_app(|app| app.is_signed_in()).unwrap_or(false)
    }
}
