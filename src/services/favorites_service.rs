// ============================================================================
// FAVORITES SERVICE - Persistencia remota de favoritos alrededor de FavoritesStore
// ============================================================================
// El store es dueño de la lista y del modo; este servicio lleva la parte async:
// descarga al iniciar sesión, recarga a petición del usuario y guardado remoto sin garantías.
// ============================================================================

use crate::error::AppError;
use crate::models::{Opportunity, SaveOpportunityRequest, SavedOpportunityRecord};
use crate::state::{AuthSession, AuthState, FavoritesRequest, FavoritesStore};

/// Backend de persistencia de favoritos, autorizado con el bearer token de la sesión
#[allow(async_fn_in_trait)]
pub trait FavoritesBackend {
    async fn fetch_saved(&self, token: &str) -> Result<Vec<SavedOpportunityRecord>, AppError>;

    async fn save(&self, token: &str, request: &SaveOpportunityRequest) -> Result<(), AppError>;
}

/// Cómo terminó una descarga remota
#[derive(Clone, Debug, PartialEq)]
pub enum FavoritesLoad {
    Loaded(usize),
    /// Cambió la sesión o empezó una recarga más nueva; la respuesta se descartó
    Discarded,
}

pub struct FavoritesService<B: FavoritesBackend> {
    backend: B,
    store: FavoritesStore,
    auth: AuthState,
    remote_enabled: bool,
}

impl<B: FavoritesBackend> FavoritesService<B> {
    /// `remote_enabled` es false si no hay URL de backend configurada
    pub fn new(backend: B, store: FavoritesStore, auth: AuthState, remote_enabled: bool) -> Self {
        Self {
            backend,
            store,
            auth,
            remote_enabled,
        }
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Iniciar una sesión autenticada y descargar sus oportunidades guardadas
    pub async fn sign_in(&self, token: String) -> Result<FavoritesLoad, AppError> {
        let session = self.auth.sign_in(token);
        if !self.remote_enabled {
            log::warn!("⚠️ URL del backend no configurada; los favoritos siguen locales");
            return Err(AppError::Config(
                "Saved opportunities are unavailable: backend not configured".to_string(),
            ));
        }
        let request = self.store.start_remote_session(session.session_id);
        self.load(request, &session).await
    }

    pub fn sign_out(&self) {
        self.auth.sign_out();
        self.store.end_remote_session();
    }

    /// "Reintentar" del usuario para la lista remota
    pub async fn reload(&self) -> Result<FavoritesLoad, AppError> {
        let session = self
            .auth
            .current_session()
            .ok_or_else(|| AppError::Validation("Sign in to reload saved opportunities".to_string()))?;
        let request = self.store.reload_favorites()?;
        self.load(request, &session).await
    }

    async fn load(&self, request: FavoritesRequest, session: &AuthSession) -> Result<FavoritesLoad, AppError> {
        log::info!("📥 Obteniendo oportunidades guardadas (sesión {})", session.session_id);
        let result: Result<Vec<Opportunity>, AppError> = self
            .backend
            .fetch_saved(&session.token)
            .await
            .map(|records| records.into_iter().map(SavedOpportunityRecord::into_opportunity).collect());

        let error = result.as_ref().err().cloned();
        if !self.store.apply_remote_result(request, result) {
            return Ok(FavoritesLoad::Discarded);
        }
        match error {
            Some(e) => Err(e),
            None => Ok(FavoritesLoad::Loaded(self.store.count())),
        }
    }

    /// Añadir en local y persistir si estamos en modo remoto. Devuelve si era nuevo.
    pub async fn save(&self, opportunity: Opportunity) -> Result<bool, AppError> {
        let added = self.store.add_favorite(opportunity.clone());
        if added {
            self.persist_save(&opportunity).await?;
        }
        Ok(added)
    }

    /// Persistencia remota, sin garantías, de un guardado ya aplicado en local.
    /// Los fallos quedan en `last_sync_error`; la entrada local se mantiene.
    pub async fn persist_save(&self, opportunity: &Opportunity) -> Result<(), AppError> {
        if !self.store.is_remote() {
            return Ok(());
        }
        let Some(session) = self.auth.current_session() else {
            return Ok(());
        };

        let request = SaveOpportunityRequest::from(opportunity);
        match self.backend.save(&session.token, &request).await {
            Ok(()) => {
                log::info!("💾 Oportunidad {} guardada en remoto", opportunity.id);
                if self.auth.is_current_session(session.session_id) {
                    self.store.set_last_sync_error(None);
                }
                Ok(())
            }
            Err(e) => {
                log::warn!("⚠️ Oportunidad {} no persistida: {}", opportunity.id, e);
                if self.auth.is_current_session(session.session_id) {
                    self.store.set_last_sync_error(Some(e.user_message()));
                }
                Err(e)
            }
        }
    }

    /// Solo local; el backend no tiene endpoint de borrado
    pub fn remove(&self, opportunity_id: i64) -> bool {
        let removed = self.store.remove_favorite(opportunity_id);
        if removed && self.store.is_remote() {
            log::debug!("🗑️ Favorito {} eliminado solo en local", opportunity_id);
        }
        removed
    }

    /// Devuelve si la oportunidad queda como favorita
    pub async fn toggle(&self, opportunity: Opportunity) -> Result<bool, AppError> {
        if self.store.is_favorite(opportunity.id) {
            self.remove(opportunity.id);
            Ok(false)
        } else {
            self.save(opportunity).await?;
            Ok(true)
        }
    }
}
