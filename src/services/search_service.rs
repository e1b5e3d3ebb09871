// ============================================================================
// SEARCH SERVICE - Pipeline paginado de búsqueda de oportunidades
// ============================================================================
// Sigue los enlaces `next` hasta agotarlos. Cada página publica sus entradas
// mapeables en la capa de marcadores al llegar; el conjunto completo sin
// duplicados va al store al final. Cada ejecución tiene un token de búsqueda;
// si deja de ser la actual se detiene en el siguiente punto de espera.
// ============================================================================

use std::collections::HashSet;
use crate::error::AppError;
use crate::maps::{MapRenderer, MarkerLayer};
use crate::models::{Opportunity, SearchOutcome, SearchPage, SearchRequest};
use crate::state::OpportunityStore;

/// Fuente de páginas de resultados. `ApiClient` en la build web,
/// páginas en memoria en los tests.
#[allow(async_fn_in_trait)]
pub trait OpportunitySource {
    async fn fetch_page(&self, url: &str) -> Result<SearchPage, AppError>;
}

/// "T3A5K9" -> "t3a+5k9"
pub fn format_postal_code(postal_code: &str) -> String {
    let compact: String = postal_code
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if compact.chars().count() <= 3 {
        return compact;
    }
    let split = compact
        .char_indices()
        .nth(3)
        .map(|(i, _)| i)
        .unwrap_or(compact.len());
    format!("{}+{}", &compact[..split], &compact[split..])
}

/// URL de la primera página. Búsqueda por código postal si hay uno usable,
/// si no por coordenadas.
pub fn build_search_url(base_url: &str, request: &SearchRequest) -> Result<String, AppError> {
    let base = base_url.trim_end_matches('/');
    if let Some(postal_code) = request.usable_postal_code() {
        return Ok(format!(
            "{}/api/search/?pc={}&md={}",
            base,
            format_postal_code(postal_code),
            request.radius_km
        ));
    }

    if !request.latitude.is_finite() || !request.longitude.is_finite() {
        return Err(AppError::Validation(
            "A location is required to search for opportunities".to_string(),
        ));
    }
    Ok(format!(
        "{}/api/search/?lat={}&lng={}&md={}",
        base, request.latitude, request.longitude, request.radius_km
    ))
}

/// URL absoluta de un enlace `next`; los relativos se resuelven contra la base de la API
pub fn resolve_next_url(base_url: &str, next: &str) -> String {
    if next.starts_with("http://") || next.starts_with("https://") {
        next.to_string()
    } else if next.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), next)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), next)
    }
}

pub struct SearchService<S: OpportunitySource> {
    source: S,
    base_url: String,
    max_pages: u32,
}

impl<S: OpportunitySource> SearchService<S> {
    pub fn new(source: S, base_url: impl Into<String>, max_pages: u32) -> Self {
        Self {
            source,
            base_url: base_url.into(),
            max_pages: max_pages.max(1),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Ejecutar una sesión de búsqueda sobre `store` y `markers`.
    ///
    /// Un error deja intacta la lista del store, restaura sus marcadores y
    /// marca la sesión como `Failed`.
    /// Una ejecución reemplazada por otro `begin_search` devuelve `Superseded`
    /// sin volver a tocar el store ni el mapa.
    pub async fn run<R: MapRenderer>(
        &self,
        store: &OpportunityStore,
        markers: &MarkerLayer<R>,
        request: &SearchRequest,
    ) -> Result<SearchOutcome, AppError> {
        let token = store.begin_search();
        log::info!("🔍 Búsqueda {} iniciada ({} km)", token, request.radius_km);

        match self.collect(store, markers, request, token).await {
            Ok(Some((opportunities, pages))) => {
                let total = opportunities.len();
                let mappable = opportunities.iter().filter(|o| o.is_mappable()).count();
                if !store.complete_search(token, opportunities) {
                    return Ok(SearchOutcome::Superseded);
                }
                log::info!("✅ Búsqueda {} terminada: {} oportunidades ({} en el mapa) en {} páginas",
                           token, total, mappable, pages);
                Ok(SearchOutcome::Completed { total, mappable, pages })
            }
            Ok(None) => {
                log::debug!("⏭️ Búsqueda {} reemplazada", token);
                Ok(SearchOutcome::Superseded)
            }
            Err(e) => {
                if store.fail_search(token, &e) {
                    log::error!("❌ Error en búsqueda {}: {}", token, e);
                    // Fuera los marcadores parciales; la lista que se mantiene recupera los suyos
                    markers.clear();
                    markers.publish(&store.mappable_opportunities());
                    Err(e)
                } else {
                    Ok(SearchOutcome::Superseded)
                }
            }
        }
    }

    /// Ok(None) si fue reemplazada
    async fn collect<R: MapRenderer>(
        &self,
        store: &OpportunityStore,
        markers: &MarkerLayer<R>,
        request: &SearchRequest,
        token: u64,
    ) -> Result<Option<(Vec<Opportunity>, u32)>, AppError> {
        let mut url = build_search_url(&self.base_url, request)?;
        markers.clear();

        let mut accumulated: Vec<Opportunity> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();
        let mut pages = 0u32;

        loop {
            let page = self.source.fetch_page(&url).await?;
            if !store.is_current_search(token) {
                return Ok(None);
            }
            pages += 1;
            let next = page.next_url().map(|n| resolve_next_url(&self.base_url, n));

            let fresh: Vec<Opportunity> = page
                .results
                .into_iter()
                .filter(|o| seen.insert(o.id))
                .collect();
            let created = markers.publish(&fresh);
            log::debug!("📄 Búsqueda {} página {}: {} nuevas, {} marcadores", token, pages, fresh.len(), created);
            accumulated.extend(fresh);

            let Some(next) = next else {
                break;
            };
            if pages >= self.max_pages {
                log::warn!("⚠️ Búsqueda {} detenida tras {} páginas; quedaban más resultados", token, pages);
                break;
            }
            url = next;
        }

        Ok(Some((accumulated, pages)))
    }
}
