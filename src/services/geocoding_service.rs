// ============================================================================
// GEOCODING SERVICE - Sugerencias de búsqueda de ubicación
// ============================================================================

use std::cell::RefCell;
use lazy_static::lazy_static;
use regex::Regex;
use crate::error::AppError;
use crate::models::PlaceCandidate;
use crate::utils::constants::GEOCODING_MIN_QUERY_LEN;

lazy_static! {
    static ref POSTAL_CODE_RE: Regex =
        Regex::new(r"(?i)\b([A-Z]\d[A-Z]\s?\d[A-Z]\d)\b").expect("postal code pattern is valid");
}

#[allow(async_fn_in_trait)]
pub trait GeocodingBackend {
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceCandidate>, AppError>;
}

/// Ubicación elegida por el usuario, lista para buscar
#[derive(Clone, Debug, PartialEq)]
pub struct LocationSelection {
    pub place_name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub postal_code: Option<String>,
}

/// Código postal canadiense del nombre del lugar, o de una entrada `postcode` del contexto.
/// Sin espacios: "T3A 5K9" -> "T3A5K9".
pub fn extract_postal_code(candidate: &PlaceCandidate) -> Option<String> {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();

    if let Some(m) = POSTAL_CODE_RE.captures(&candidate.place_name).and_then(|c| c.get(1)) {
        return Some(strip(m.as_str()));
    }
    candidate
        .context
        .iter()
        .find(|ctx| ctx.id.starts_with("postcode"))
        .map(|ctx| strip(&ctx.text))
}

impl From<&PlaceCandidate> for LocationSelection {
    fn from(candidate: &PlaceCandidate) -> Self {
        Self {
            place_name: candidate.place_name.clone(),
            longitude: candidate.longitude(),
            latitude: candidate.latitude(),
            postal_code: extract_postal_code(candidate),
        }
    }
}

pub struct GeocodingService<B: GeocodingBackend> {
    backend: B,
    suggestions: RefCell<Vec<PlaceCandidate>>,
    query_token: RefCell<u64>,
}

impl<B: GeocodingBackend> GeocodingService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            suggestions: RefCell::new(Vec::new()),
            query_token: RefCell::new(0),
        }
    }

    fn next_token(&self) -> u64 {
        let mut token = self.query_token.borrow_mut();
        *token += 1;
        *token
    }

    /// Pedir sugerencias para `query`. Devuelve None si una consulta más nueva
    /// terminó antes. Los fallos vacían las sugerencias.
    pub async fn search(&self, query: &str) -> Result<Option<Vec<PlaceCandidate>>, AppError> {
        let token = self.next_token();
        if query.chars().count() < GEOCODING_MIN_QUERY_LEN {
            self.suggestions.borrow_mut().clear();
            return Ok(Some(Vec::new()));
        }

        let result = self.backend.search_places(query).await;
        if *self.query_token.borrow() != token {
            log::debug!("⏭️ Descartando sugerencias de la consulta obsoleta '{}'", query);
            return Ok(None);
        }

        match result {
            Ok(candidates) => {
                *self.suggestions.borrow_mut() = candidates.clone();
                Ok(Some(candidates))
            }
            Err(e) => {
                log::error!("❌ Error buscando ubicaciones: {}", e);
                self.suggestions.borrow_mut().clear();
                Err(e)
            }
        }
    }

    pub fn suggestions(&self) -> Vec<PlaceCandidate> {
        self.suggestions.borrow().clone()
    }

    /// Elegir una de las sugerencias actuales por id
    pub fn select(&self, candidate_id: &str) -> Option<LocationSelection> {
        let selection = self
            .suggestions
            .borrow()
            .iter()
            .find(|c| c.id == candidate_id)
            .map(LocationSelection::from)?;
        log::info!("📍 Ubicación seleccionada: {} (código postal: {:?})",
                   selection.place_name, selection.postal_code);
        // Invalidar consultas en curso para que la lista siga cerrada
        self.next_token();
        self.suggestions.borrow_mut().clear();
        Some(selection)
    }
}
