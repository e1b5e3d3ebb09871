// ============================================================================
// OPPORTUNITY STATE - Lista de candidatas, selección, radio y filtro del mazo
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::config::CONFIG;
use crate::error::AppError;
use crate::models::Opportunity;
use crate::utils::constants::{
    MAX_DISTANCE_STEP_KM, MAX_MAX_DISTANCE_KM, MIN_MAX_DISTANCE_KM,
    PREF_HIDE_REMOTE_KEY, PREF_MAX_DISTANCE_KEY,
};
use crate::utils::storage::{load_bool_pref, load_u32_pref, save_pref};

/// Ciclo de vida de la sesión de búsqueda actual
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Qué cambió; se envía a los suscriptores tras cada mutación
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreChange {
    Opportunities,
    Selection,
    Filter,
    Radius,
    SearchStatus,
}

type Subscriber = Rc<dyn Fn(StoreChange)>;

/// Limitar al rango del slider y redondear al paso de 5 km
pub fn normalize_max_distance(value: u32) -> u32 {
    let clamped = value.clamp(MIN_MAX_DISTANCE_KM, MAX_MAX_DISTANCE_KM);
    let snapped = (clamped + MAX_DISTANCE_STEP_KM / 2) / MAX_DISTANCE_STEP_KM * MAX_DISTANCE_STEP_KM;
    snapped.clamp(MIN_MAX_DISTANCE_KM, MAX_MAX_DISTANCE_KM)
}

#[derive(Clone)]
pub struct OpportunityStore {
    pub opportunities: Rc<RefCell<Vec<Opportunity>>>,
    pub selected_opportunity: Rc<RefCell<Option<Opportunity>>>,
    pub max_distance_km: Rc<RefCell<u32>>,
    pub hide_remote_opportunities: Rc<RefCell<bool>>,
    pub search_status: Rc<RefCell<SearchStatus>>,
    pub last_search_completed_at: Rc<RefCell<Option<DateTime<Utc>>>>,
    /// Se incrementa en cada reemplazo de `opportunities`
    pub list_version: Rc<RefCell<u64>>,
    search_token: Rc<RefCell<u64>>,
    change_subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

impl OpportunityStore {
    /// Crear el store restaurando las preferencias guardadas de radio/filtro
    pub fn new() -> Self {
        let max_distance = load_u32_pref(PREF_MAX_DISTANCE_KEY)
            .unwrap_or(CONFIG.search_config.default_max_distance_km);
        let hide_remote = load_bool_pref(PREF_HIDE_REMOTE_KEY).unwrap_or(false);
        Self::with_preferences(max_distance, hide_remote)
    }

    pub fn with_preferences(max_distance_km: u32, hide_remote: bool) -> Self {
        Self {
            opportunities: Rc::new(RefCell::new(Vec::new())),
            selected_opportunity: Rc::new(RefCell::new(None)),
            max_distance_km: Rc::new(RefCell::new(normalize_max_distance(max_distance_km))),
            hide_remote_opportunities: Rc::new(RefCell::new(hide_remote)),
            search_status: Rc::new(RefCell::new(SearchStatus::Idle)),
            last_search_completed_at: Rc::new(RefCell::new(None)),
            list_version: Rc::new(RefCell::new(0)),
            search_token: Rc::new(RefCell::new(0)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    // ---------------------------------------------------------------- list

    /// Reemplazar toda la lista. Sin dedup: llegan resultados frescos de la búsqueda.
    pub fn set_opportunities(&self, opportunities: Vec<Opportunity>) {
        log::info!("📋 Store de oportunidades: {} oportunidades", opportunities.len());
        *self.opportunities.borrow_mut() = opportunities;
        *self.list_version.borrow_mut() += 1;

        // Limpiar selección obsoleta
        let stale = {
            let selected = self.selected_opportunity.borrow();
            match selected.as_ref() {
                Some(sel) => !self.opportunities.borrow().iter().any(|o| o.id == sel.id),
                None => false,
            }
        };
        if stale {
            *self.selected_opportunity.borrow_mut() = None;
        }

        self.notify(StoreChange::Opportunities);
        if stale {
            self.notify(StoreChange::Selection);
        }
    }

    pub fn get_opportunities(&self) -> Vec<Opportunity> {
        self.opportunities.borrow().clone()
    }

    pub fn opportunity_by_id(&self, id: i64) -> Option<Opportunity> {
        self.opportunities.borrow().iter().find(|o| o.id == id).cloned()
    }

    pub fn get_list_version(&self) -> u64 {
        *self.list_version.borrow()
    }

    /// Vista del mazo: todo, o solo mapeables si se ocultan las remotas
    pub fn filtered_opportunities(&self) -> Vec<Opportunity> {
        let hide_remote = self.get_hide_remote_opportunities();
        self.opportunities
            .borrow()
            .iter()
            .filter(|o| !hide_remote || o.is_mappable())
            .cloned()
            .collect()
    }

    /// Vista del mapa: siempre solo mapeables
    pub fn mappable_opportunities(&self) -> Vec<Opportunity> {
        self.opportunities
            .borrow()
            .iter()
            .filter(|o| o.is_mappable())
            .cloned()
            .collect()
    }

    // ----------------------------------------------------------- selection

    /// Foco externo (clic en marcador). No mueve el cursor del swipe.
    pub fn set_selected_opportunity(&self, opportunity: Option<Opportunity>) {
        if let Some(ref opp) = opportunity {
            if self.opportunity_by_id(opp.id).is_none() {
                log::warn!("⚠️ La oportunidad seleccionada {} no está en la lista actual", opp.id);
            }
        }
        *self.selected_opportunity.borrow_mut() = opportunity;
        self.notify(StoreChange::Selection);
    }

    /// Seleccionar por id; false si no está en la lista actual
    pub fn select_by_id(&self, id: i64) -> bool {
        match self.opportunity_by_id(id) {
            Some(opp) => {
                self.set_selected_opportunity(Some(opp));
                true
            }
            None => false,
        }
    }

    pub fn get_selected_opportunity(&self) -> Option<Opportunity> {
        self.selected_opportunity.borrow().clone()
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected_opportunity.borrow().as_ref().map(|o| o.id)
    }

    // ------------------------------------------------------ radius/filter

    /// Devuelve el valor guardado. No relanza la búsqueda.
    pub fn set_max_distance_km(&self, value: u32) -> u32 {
        let normalized = normalize_max_distance(value);
        if normalized != value {
            log::debug!("📏 Radio {} km normalizado a {} km", value, normalized);
        }
        *self.max_distance_km.borrow_mut() = normalized;
        save_pref(PREF_MAX_DISTANCE_KEY, normalized);
        self.notify(StoreChange::Radius);
        normalized
    }

    pub fn get_max_distance_km(&self) -> u32 {
        *self.max_distance_km.borrow()
    }

    /// Solo filtra el mazo; el mapa siempre muestra las mapeables
    pub fn set_hide_remote_opportunities(&self, hide: bool) {
        if *self.hide_remote_opportunities.borrow() == hide {
            return;
        }
        *self.hide_remote_opportunities.borrow_mut() = hide;
        save_pref(PREF_HIDE_REMOTE_KEY, hide);
        self.notify(StoreChange::Filter);
    }

    pub fn get_hide_remote_opportunities(&self) -> bool {
        *self.hide_remote_opportunities.borrow()
    }

    // ----------------------------------------------------- search session

    /// Nueva sesión de búsqueda; todos los tokens anteriores quedan obsoletos
    pub fn begin_search(&self) -> u64 {
        let token = {
            let mut current = self.search_token.borrow_mut();
            *current += 1;
            *current
        };
        *self.search_status.borrow_mut() = SearchStatus::Loading;
        self.notify(StoreChange::SearchStatus);
        token
    }

    pub fn is_current_search(&self, token: u64) -> bool {
        *self.search_token.borrow() == token
    }

    /// Publicar el resultado final. Se ignora si la sesión fue reemplazada.
    pub fn complete_search(&self, token: u64, opportunities: Vec<Opportunity>) -> bool {
        if !self.is_current_search(token) {
            log::debug!("⏭️ Descartando resultados de la búsqueda reemplazada {}", token);
            return false;
        }
        self.set_opportunities(opportunities);
        *self.search_status.borrow_mut() = SearchStatus::Ready;
        *self.last_search_completed_at.borrow_mut() = Some(Utc::now());
        self.notify(StoreChange::SearchStatus);
        true
    }

    /// Registrar un fallo. La lista mantiene su último estado válido.
    pub fn fail_search(&self, token: u64, error: &AppError) -> bool {
        if !self.is_current_search(token) {
            return false;
        }
        *self.search_status.borrow_mut() = SearchStatus::Failed(error.user_message());
        self.notify(StoreChange::SearchStatus);
        true
    }

    pub fn get_search_status(&self) -> SearchStatus {
        self.search_status.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.get_search_status() == SearchStatus::Loading
    }

    pub fn get_last_search_completed_at(&self) -> Option<DateTime<Utc>> {
        *self.last_search_completed_at.borrow()
    }

    // ---------------------------------------------------------- reactivity

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(StoreChange) + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    fn notify(&self, change: StoreChange) {
        // Copia para que los callbacks puedan suscribirse o mutar el store
        let subscribers: Vec<Subscriber> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback(change);
        }
    }
}

impl Default for OpportunityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Audience;

    fn opp(id: i64, mappable: bool) -> Opportunity {
        Opportunity {
            id,
            remote_or_online: !mappable,
            audience: Audience {
                scope: "local".to_string(),
                longitude: Some(-114.0),
                latitude: Some(51.0),
            },
            ..Default::default()
        }
    }

    #[test]
    fn radius_is_clamped_and_snapped() {
        assert_eq!(normalize_max_distance(0), 5);
        assert_eq!(normalize_max_distance(7), 5);
        assert_eq!(normalize_max_distance(8), 10);
        assert_eq!(normalize_max_distance(25), 25);
        assert_eq!(normalize_max_distance(99), 100);
        assert_eq!(normalize_max_distance(250), 100);
    }

    #[test]
    fn default_radius_is_25() {
        let store = OpportunityStore::with_preferences(25, false);
        assert_eq!(store.get_max_distance_km(), 25);
        assert_eq!(store.set_max_distance_km(42), 40);
        assert_eq!(store.get_max_distance_km(), 40);
    }

    #[test]
    fn filter_only_hides_non_mappable_from_deck() {
        let store = OpportunityStore::with_preferences(25, false);
        store.set_opportunities(vec![opp(1, true), opp(2, false), opp(3, true)]);

        assert_eq!(store.filtered_opportunities().len(), 3);
        store.set_hide_remote_opportunities(true);
        let ids: Vec<i64> = store.filtered_opportunities().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.mappable_opportunities().len(), 2);
    }

    #[test]
    fn replacing_list_clears_stale_selection() {
        let store = OpportunityStore::with_preferences(25, false);
        store.set_opportunities(vec![opp(1, true), opp(2, true)]);
        assert!(store.select_by_id(2));

        store.set_opportunities(vec![opp(2, true), opp(3, true)]);
        assert_eq!(store.selected_id(), Some(2));

        store.set_opportunities(vec![opp(4, true)]);
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn select_unknown_id_is_rejected() {
        let store = OpportunityStore::with_preferences(25, false);
        store.set_opportunities(vec![opp(1, true)]);
        assert!(!store.select_by_id(99));
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn superseded_search_cannot_publish() {
        let store = OpportunityStore::with_preferences(25, false);
        let first = store.begin_search();
        let second = store.begin_search();

        assert!(!store.complete_search(first, vec![opp(1, true)]));
        assert!(store.get_opportunities().is_empty());
        assert_eq!(store.get_search_status(), SearchStatus::Loading);

        assert!(store.complete_search(second, vec![opp(2, true)]));
        assert_eq!(store.get_opportunities().len(), 1);
        assert_eq!(store.get_search_status(), SearchStatus::Ready);
        assert!(store.get_last_search_completed_at().is_some());
    }

    #[test]
    fn failed_search_keeps_previous_results() {
        let store = OpportunityStore::with_preferences(25, false);
        let token = store.begin_search();
        store.complete_search(token, vec![opp(1, true)]);

        let token = store.begin_search();
        assert!(store.fail_search(token, &AppError::Network("offline".to_string())));
        assert_eq!(store.get_opportunities().len(), 1);
        assert!(matches!(store.get_search_status(), SearchStatus::Failed(_)));
    }

    #[test]
    fn subscribers_receive_changes() {
        let store = OpportunityStore::with_preferences(25, false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |change| sink.borrow_mut().push(change));

        store.set_hide_remote_opportunities(true);
        store.set_hide_remote_opportunities(true);
        store.set_max_distance_km(50);

        assert_eq!(*seen.borrow(), vec![StoreChange::Filter, StoreChange::Radius]);
    }
}
