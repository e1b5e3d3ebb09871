// ============================================================================
// APP - Conexión de stores, servicios y view models para la build web
// ============================================================================
// El shell JS pinta; Rust lleva el estado y la lógica. Tras cada cambio se
// lanza un evento `voluntr:changed` en window y el shell pide datos frescos
// con los getters exportados en lib.rs.
// ============================================================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use crate::config::CONFIG;
use crate::maps::web::WebMapRenderer;
use crate::maps::{Coordinates, MarkerLayer};
use crate::models::{Opportunity, PlaceCandidate};
use crate::services::{
    ApiClient, FavoritesService, GeocodingService, LocationSelection, SearchService,
};
use crate::state::{AuthState, FavoritesStore, OpportunityStore, SearchStatus, StoreChange};
use crate::utils::constants::SWIPE_EXIT_ANIMATION_MS;
use crate::viewmodels::{
    FavoritesPanel, FavoritesViewModel, SearchViewModel, SwipeCard, SwipeOutcome, SwipeViewModel,
};

const MAP_CONTAINER_ID: &str = "map";
const GEOCODE_DEBOUNCE_MS: u32 = 300;

type WebSearchViewModel = SearchViewModel<ApiClient, WebMapRenderer>;

/// Qué parte de la UI debe volver a leer sus datos
#[derive(Clone, Copy, Debug)]
pub enum ChangeKind {
    Opportunities,
    Selection,
    Search,
    Swipe,
    Favorites,
    Suggestions,
}

impl ChangeKind {
    fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Opportunities => "opportunities",
            ChangeKind::Selection => "selection",
            ChangeKind::Search => "search",
            ChangeKind::Swipe => "swipe",
            ChangeKind::Favorites => "favorites",
            ChangeKind::Suggestions => "suggestions",
        }
    }
}

/// Avisar al shell JS para que repinte una zona
pub fn emit_change(kind: ChangeKind) {
    let Some(window) = web_sys::window() else {
        return;
    };
    match web_sys::CustomEvent::new("voluntr:changed") {
        Ok(event) => {
            event.init_custom_event_with_can_bubble_and_cancelable_and_detail(
                "voluntr:changed",
                false,
                false,
                &JsValue::from_str(kind.as_str()),
            );
            if let Err(e) = window.dispatch_event(&event) {
                log::warn!("⚠️ Evento de cambio no enviado: {:?}", e);
            }
        }
        Err(e) => log::warn!("⚠️ Evento de cambio no creado: {:?}", e),
    }
}

pub struct App {
    opportunities: OpportunityStore,
    favorites_service: Rc<FavoritesService<ApiClient>>,
    geocoding: Rc<GeocodingService<ApiClient>>,
    search: Rc<WebSearchViewModel>,
    swipe: Rc<SwipeViewModel>,
    favorites_panel: FavoritesViewModel,
    pending_geocode: RefCell<Option<Timeout>>,
}

impl App {
    pub fn new() -> Rc<Self> {
        let config = &*CONFIG;
        let client = ApiClient::new(config);

        let mut renderer = WebMapRenderer::new();
        match config.mapbox_token() {
            Ok(token) => renderer.initialize(
                MAP_CONTAINER_ID,
                token,
                Coordinates {
                    longitude: config.map_config.default_center_lng,
                    latitude: config.map_config.default_center_lat,
                },
                config.map_config.default_zoom,
            ),
            Err(e) => log::error!("❌ Mapa desactivado: {}", e),
        }
        let markers = Rc::new(MarkerLayer::new(renderer));

        let opportunities = OpportunityStore::new();
        let favorites = FavoritesStore::new();
        let auth = AuthState::new();

        let search = Rc::new(SearchViewModel::new(
            SearchService::new(
                client.clone(),
                config.opportunities_api_url.clone(),
                config.search_config.max_pages,
            ),
            opportunities.clone(),
            markers,
            config.map_config.clone(),
        ));
        let favorites_service = Rc::new(FavoritesService::new(
            client.clone(),
            favorites.clone(),
            auth,
            config.has_backend_configured(),
        ));
        if !config.has_backend_configured() {
            log::warn!("⚠️ BACKEND_API_URL no definida: favoritos solo en local");
        }
        let swipe = Rc::new(SwipeViewModel::new(opportunities.clone(), favorites.clone()));

        let app = Rc::new(Self {
            favorites_panel: FavoritesViewModel::new(favorites.clone(), opportunities.clone()),
            opportunities: opportunities.clone(),
            favorites_service,
            geocoding: Rc::new(GeocodingService::new(client)),
            search,
            swipe,
            pending_geocode: RefCell::new(None),
        });

        Self::subscribe(&app, &opportunities, &favorites);
        log::info!("✅ App lista (API: {})", config.opportunities_api_url);
        app
    }

    fn subscribe(app: &Rc<Self>, opportunities: &OpportunityStore, favorites: &FavoritesStore) {
        let weak: Weak<Self> = Rc::downgrade(app);
        opportunities.subscribe(move |change| {
            let Some(app) = weak.upgrade() else {
                return;
            };
            match change {
                StoreChange::Opportunities | StoreChange::Filter => {
                    app.swipe.sync();
                    emit_change(ChangeKind::Opportunities);
                }
                StoreChange::Selection => {
                    app.swipe.sync();
                    app.search.focus_selected();
                    emit_change(ChangeKind::Selection);
                }
                StoreChange::Radius | StoreChange::SearchStatus => emit_change(ChangeKind::Search),
            }
        });

        favorites.subscribe(|| emit_change(ChangeKind::Favorites));
    }

    // ------------------------------------------------------------- search

    /// Autocompletado de ubicación con debounce
    pub fn on_location_query(self: &Rc<Self>, query: String) {
        let app = Rc::clone(self);
        let timeout = Timeout::new(GEOCODE_DEBOUNCE_MS, move || {
            spawn_local(async move {
                match app.geocoding.search(&query).await {
                    Ok(Some(_)) | Err(_) => emit_change(ChangeKind::Suggestions),
                    Ok(None) => {}
                }
            });
        });
        // Soltar el handle anterior lo cancela
        *self.pending_geocode.borrow_mut() = Some(timeout);
    }

    pub fn suggestions(&self) -> Vec<PlaceCandidate> {
        self.geocoding.suggestions()
    }

    pub fn select_location(self: &Rc<Self>, candidate_id: &str) -> bool {
        match self.geocoding.select(candidate_id) {
            Some(selection) => {
                emit_change(ChangeKind::Suggestions);
                self.search_at(selection);
                true
            }
            None => false,
        }
    }

    pub fn search_at(self: &Rc<Self>, selection: LocationSelection) {
        let app = Rc::clone(self);
        spawn_local(async move {
            if let Err(e) = app.search.search_location(selection).await {
                log::error!("❌ Error en búsqueda: {}", e);
            }
        });
    }

    pub fn retry_search(self: &Rc<Self>) {
        let app = Rc::clone(self);
        spawn_local(async move {
            if let Err(e) = app.search.refresh().await {
                log::error!("❌ Error al reintentar la búsqueda: {}", e);
            }
        });
    }

    /// Slider de radio; vuelve a buscar si ya había una ubicación
    pub fn set_max_distance_km(self: &Rc<Self>, value: u32) -> u32 {
        let stored = self.search.set_max_distance_km(value);
        if self.search.has_location() {
            self.retry_search();
        }
        stored
    }

    pub fn set_hide_remote(&self, hide: bool) {
        self.opportunities.set_hide_remote_opportunities(hide);
    }

    pub fn search_status(&self) -> SearchStatus {
        self.opportunities.get_search_status()
    }

    pub fn on_marker_click(&self, opportunity_id: i64) -> bool {
        self.search.select_marker(opportunity_id)
    }

    // -------------------------------------------------------------- swipe

    pub fn current_card(&self) -> Option<SwipeCard> {
        self.swipe.current_card()
    }

    pub fn pointer_down(self: &Rc<Self>, x: f64) {
        let outcome = self.swipe.pointer_down(x);
        self.handle_swipe(outcome);
    }

    pub fn pointer_move(self: &Rc<Self>, x: f64) {
        let outcome = self.swipe.pointer_move(x);
        self.handle_swipe(outcome);
    }

    pub fn pointer_up(self: &Rc<Self>) {
        let outcome = self.swipe.pointer_up();
        self.handle_swipe(outcome);
    }

    pub fn pointer_cancel(self: &Rc<Self>) {
        let outcome = self.swipe.pointer_cancel();
        self.handle_swipe(outcome);
    }

    pub fn save_current(self: &Rc<Self>) {
        let outcome = self.swipe.save();
        self.handle_swipe(outcome);
    }

    pub fn skip_current(self: &Rc<Self>) {
        let outcome = self.swipe.skip();
        self.handle_swipe(outcome);
    }

    fn handle_swipe(self: &Rc<Self>, outcome: SwipeOutcome) {
        match outcome {
            SwipeOutcome::Ignored | SwipeOutcome::Disabled => return,
            SwipeOutcome::Dragging(_) | SwipeOutcome::SnappedBack => {}
            SwipeOutcome::Exiting { exit_id, newly_saved, .. } => {
                let app = Rc::clone(self);
                Timeout::new(SWIPE_EXIT_ANIMATION_MS, move || {
                    if app.swipe.finish_exit(exit_id) {
                        emit_change(ChangeKind::Swipe);
                    }
                })
                .forget();
                if let Some(opportunity) = newly_saved {
                    self.persist_save(opportunity);
                }
            }
            SwipeOutcome::SavedAtEnd { newly_saved } => {
                if let Some(opportunity) = newly_saved {
                    self.persist_save(opportunity);
                }
            }
        }
        emit_change(ChangeKind::Swipe);
    }

    // ---------------------------------------------------------- favorites

    fn persist_save(self: &Rc<Self>, opportunity: Opportunity) {
        let app = Rc::clone(self);
        spawn_local(async move {
            // El fallo queda en last_sync_error del store
            let _ = app.favorites_service.persist_save(&opportunity).await;
        });
    }

    pub fn favorites_panel(&self) -> FavoritesPanel {
        self.favorites_panel.panel()
    }

    /// Toggle desde el corazón de la carta o la lista de favoritos
    pub fn toggle_favorite(self: &Rc<Self>, opportunity_id: i64) -> bool {
        let opportunity = self
            .opportunities
            .opportunity_by_id(opportunity_id)
            .or_else(|| {
                self.favorites_service
                    .store()
                    .favorites()
                    .into_iter()
                    .find(|o| o.id == opportunity_id)
            });
        let Some(opportunity) = opportunity else {
            return false;
        };

        let app = Rc::clone(self);
        spawn_local(async move {
            if let Err(e) = app.favorites_service.toggle(opportunity).await {
                log::warn!("⚠️ Toggle de favorito no persistido: {}", e);
            }
        });
        true
    }

    pub fn open_favorite(&self, opportunity_id: i64) -> bool {
        self.favorites_panel.open_favorite(opportunity_id)
    }

    pub fn reload_favorites(self: &Rc<Self>) {
        let app = Rc::clone(self);
        spawn_local(async move {
            if let Err(e) = app.favorites_service.reload().await {
                log::error!("❌ Error recargando favoritos: {}", e);
            }
        });
    }

    // --------------------------------------------------------------- auth

    pub fn sign_in(self: &Rc<Self>, token: String) {
        let app = Rc::clone(self);
        spawn_local(async move {
            if let Err(e) = app.favorites_service.sign_in(token).await {
                log::error!("❌ Oportunidades guardadas no cargadas: {}", e);
            }
        });
    }

    pub fn sign_out(&self) {
        self.favorites_service.sign_out();
    }

    pub fn is_signed_in(&self) -> bool {
        self.favorites_service.auth().is_signed_in()
    }
}
