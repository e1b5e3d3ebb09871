// ============================================================================
// FAVORITES STATE - Oportunidades guardadas, locales o de una sesión remota
// ============================================================================
// Solo hay una fuente activa a la vez. Al iniciar sesión se aparca la lista
// local y al cerrarla se restaura; nunca se mezclan.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use serde::Serialize;
use crate::error::AppError;
use crate::models::Opportunity;

/// Ciclo de vida de la descarga remota
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteStatus {
    Loading,
    Ready,
    FetchFailed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FavoritesSource {
    Local(Vec<Opportunity>),
    Remote {
        favorites: Vec<Opportunity>,
        session_id: u64,
        status: RemoteStatus,
        /// Lista anónima que se restaura al cerrar sesión
        parked_local: Vec<Opportunity>,
        /// Añadidas en esta sesión y aún no vistas en una lista descargada
        unsynced: Vec<Opportunity>,
    },
}

/// Lo que debe pintar el panel de favoritos
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FavoritesView {
    Loading,
    Empty,
    Items(Vec<Opportunity>),
    /// Falló la descarga remota; distinto de un usuario autenticado sin favoritos
    FetchFailed(String),
}

/// Ticket de una descarga remota; los resultados con un ticket viejo se descartan
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FavoritesRequest {
    pub session_id: u64,
    pub request_id: u64,
}

#[derive(Clone)]
pub struct FavoritesStore {
    pub source: Rc<RefCell<FavoritesSource>>,
    pub last_sync_error: Rc<RefCell<Option<String>>>,
    latest_request: Rc<RefCell<Option<FavoritesRequest>>>,
    request_counter: Rc<RefCell<u64>>,
    change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

fn dedup_by_id(items: Vec<Opportunity>) -> Vec<Opportunity> {
    let mut unique: Vec<Opportunity> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.iter().any(|o| o.id == item.id) {
            unique.push(item);
        }
    }
    unique
}

fn push_unique(list: &mut Vec<Opportunity>, opportunity: Opportunity) -> bool {
    if list.iter().any(|o| o.id == opportunity.id) {
        return false;
    }
    list.push(opportunity);
    true
}

fn remove_by_id(list: &mut Vec<Opportunity>, id: i64) -> bool {
    let before = list.len();
    list.retain(|o| o.id != id);
    list.len() != before
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self {
            source: Rc::new(RefCell::new(FavoritesSource::Local(Vec::new()))),
            last_sync_error: Rc::new(RefCell::new(None)),
            latest_request: Rc::new(RefCell::new(None)),
            request_counter: Rc::new(RefCell::new(0)),
            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn with_list<T>(&self, f: impl FnOnce(&Vec<Opportunity>) -> T) -> T {
        match &*self.source.borrow() {
            FavoritesSource::Local(list) => f(list),
            FavoritesSource::Remote { favorites, .. } => f(favorites),
        }
    }

    // ------------------------------------------------------------- queries

    pub fn favorites(&self) -> Vec<Opportunity> {
        self.with_list(|list| list.clone())
    }

    pub fn count(&self) -> usize {
        self.with_list(|list| list.len())
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.with_list(|list| list.iter().any(|o| o.id == id))
    }

    pub fn is_remote(&self) -> bool {
        matches!(&*self.source.borrow(), FavoritesSource::Remote { .. })
    }

    pub fn remote_session_id(&self) -> Option<u64> {
        match &*self.source.borrow() {
            FavoritesSource::Remote { session_id, .. } => Some(*session_id),
            FavoritesSource::Local(_) => None,
        }
    }

    pub fn remote_status(&self) -> Option<RemoteStatus> {
        match &*self.source.borrow() {
            FavoritesSource::Remote { status, .. } => Some(status.clone()),
            FavoritesSource::Local(_) => None,
        }
    }

    pub fn fetch_failed(&self) -> bool {
        matches!(self.remote_status(), Some(RemoteStatus::FetchFailed(_)))
    }

    pub fn view(&self) -> FavoritesView {
        match &*self.source.borrow() {
            FavoritesSource::Remote { status: RemoteStatus::Loading, .. } => FavoritesView::Loading,
            FavoritesSource::Remote { status: RemoteStatus::FetchFailed(msg), .. } => {
                FavoritesView::FetchFailed(msg.clone())
            }
            FavoritesSource::Remote { favorites: list, .. } | FavoritesSource::Local(list) => {
                if list.is_empty() {
                    FavoritesView::Empty
                } else {
                    FavoritesView::Items(list.clone())
                }
            }
        }
    }

    // ----------------------------------------------------------- mutations

    /// Idempotente por id. Devuelve true si se añadió.
    pub fn add_favorite(&self, opportunity: Opportunity) -> bool {
        let id = opportunity.id;
        let added = {
            let mut source = self.source.borrow_mut();
            match &mut *source {
                FavoritesSource::Local(list) => push_unique(list, opportunity),
                FavoritesSource::Remote { favorites, unsynced, .. } => {
                    let added = push_unique(favorites, opportunity.clone());
                    if added {
                        push_unique(unsynced, opportunity);
                    }
                    added
                }
            }
        };
        if added {
            log::info!("❤️ Favorito añadido: {}", id);
            self.notify();
        }
        added
    }

    pub fn remove_favorite(&self, id: i64) -> bool {
        let removed = {
            let mut source = self.source.borrow_mut();
            match &mut *source {
                FavoritesSource::Local(list) => remove_by_id(list, id),
                FavoritesSource::Remote { favorites, unsynced, .. } => {
                    remove_by_id(unsynced, id);
                    remove_by_id(favorites, id)
                }
            }
        };
        if removed {
            log::info!("💔 Favorito eliminado: {}", id);
            self.notify();
        }
        removed
    }

    /// Devuelve si la oportunidad queda como favorita
    pub fn toggle_favorite(&self, opportunity: Opportunity) -> bool {
        if self.is_favorite(opportunity.id) {
            self.remove_favorite(opportunity.id);
            false
        } else {
            self.add_favorite(opportunity);
            true
        }
    }

    // ------------------------------------------------------ mode switching

    fn next_request(&self, session_id: u64) -> FavoritesRequest {
        let request_id = {
            let mut counter = self.request_counter.borrow_mut();
            *counter += 1;
            *counter
        };
        let request = FavoritesRequest { session_id, request_id };
        *self.latest_request.borrow_mut() = Some(request);
        request
    }

    /// Pasar a modo remoto para una sesión autenticada. El ticket devuelto
    /// es el de la primera descarga.
    pub fn start_remote_session(&self, session_id: u64) -> FavoritesRequest {
        let previous = std::mem::replace(&mut *self.source.borrow_mut(), FavoritesSource::Local(Vec::new()));
        let parked_local = match previous {
            FavoritesSource::Local(list) => list,
            FavoritesSource::Remote { parked_local, .. } => parked_local,
        };
        *self.source.borrow_mut() = FavoritesSource::Remote {
            favorites: Vec::new(),
            session_id,
            status: RemoteStatus::Loading,
            parked_local,
            unsynced: Vec::new(),
        };
        *self.last_sync_error.borrow_mut() = None;
        log::info!("🔐 Favoritos: sesión remota {} iniciada", session_id);
        let request = self.next_request(session_id);
        self.notify();
        request
    }

    /// Volver a modo anónimo. La lista remota se descarta y cualquier descarga en curso queda obsoleta.
    pub fn end_remote_session(&self) {
        let previous = std::mem::replace(&mut *self.source.borrow_mut(), FavoritesSource::Local(Vec::new()));
        match previous {
            FavoritesSource::Remote { parked_local, session_id, .. } => {
                *self.source.borrow_mut() = FavoritesSource::Local(parked_local);
                log::info!("👋 Favoritos: sesión remota {} terminada", session_id);
            }
            local => {
                *self.source.borrow_mut() = local;
                return;
            }
        }
        *self.latest_request.borrow_mut() = None;
        *self.last_sync_error.borrow_mut() = None;
        self.notify();
    }

    /// Volver a descargar la lista remota. Solo en modo remoto.
    pub fn reload_favorites(&self) -> Result<FavoritesRequest, AppError> {
        let session_id = {
            let mut source = self.source.borrow_mut();
            match &mut *source {
                FavoritesSource::Remote { session_id, status, .. } => {
                    *status = RemoteStatus::Loading;
                    *session_id
                }
                FavoritesSource::Local(_) => {
                    return Err(AppError::Validation(
                        "Favorites can only be reloaded while signed in".to_string(),
                    ));
                }
            }
        };
        let request = self.next_request(session_id);
        self.notify();
        Ok(request)
    }

    pub fn is_current_request(&self, request: FavoritesRequest) -> bool {
        *self.latest_request.borrow() == Some(request) && self.remote_session_id() == Some(request.session_id)
    }

    /// Aplicar el resultado de una descarga remota. Devuelve false si el ticket es viejo.
    pub fn apply_remote_result(
        &self,
        request: FavoritesRequest,
        result: Result<Vec<Opportunity>, AppError>,
    ) -> bool {
        if !self.is_current_request(request) {
            log::debug!("⏭️ Descartando respuesta obsoleta de favoritos (sesión {}, petición {})",
                        request.session_id, request.request_id);
            return false;
        }

        {
            let mut source = self.source.borrow_mut();
            if let FavoritesSource::Remote { favorites, status, unsynced, .. } = &mut *source {
                match result {
                    Ok(list) => {
                        let mut fetched = dedup_by_id(list);
                        // Lo guardado durante la descarga sobrevive a ella
                        unsynced.retain(|o| !fetched.iter().any(|f| f.id == o.id));
                        fetched.extend(unsynced.iter().cloned());
                        *favorites = fetched;
                        *status = RemoteStatus::Ready;
                        log::info!("✅ Favoritos cargados: {} oportunidades guardadas", favorites.len());
                    }
                    Err(e) => {
                        log::error!("❌ Error cargando favoritos: {}", e);
                        favorites.clear();
                        *status = RemoteStatus::FetchFailed(e.user_message());
                    }
                }
            }
        }
        self.notify();
        true
    }

    // -------------------------------------------------------- sync errors

    pub fn set_last_sync_error(&self, error: Option<String>) {
        *self.last_sync_error.borrow_mut() = error;
        self.notify();
    }

    pub fn get_last_sync_error(&self) -> Option<String> {
        self.last_sync_error.borrow().clone()
    }

    // ---------------------------------------------------------- reactivity

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    fn notify(&self) {
        let subscribers: Vec<Rc<dyn Fn()>> = self.change_subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}
