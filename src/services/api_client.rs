// ============================================================================
// API CLIENT - Solo HTTP (sin estado)
// ============================================================================
// Sin lógica de negocio: peticiones, comprobación de status y decodificación
// JSON para la API de oportunidades, el backend de favoritos y el geocoding de Mapbox.
// ============================================================================

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{
    GeocodingResponse, PlaceCandidate, SaveOpportunityRequest, SavedOpportunitiesResponse,
    SavedOpportunityRecord, SearchPage,
};
use crate::utils::constants::{GEOCODING_API_URL, GEOCODING_RESULT_LIMIT};
use super::favorites_service::FavoritesBackend;
use super::geocoding_service::GeocodingBackend;
use super::search_service::OpportunitySource;

#[derive(Clone)]
pub struct ApiClient {
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self { config: config.clone() }
    }

    fn backend_endpoint(&self, path: &str) -> Result<String, AppError> {
        Ok(format!("{}{}", self.config.backend_url()?, path))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        if !response.ok() {
            let status = response.status();
            let message = response
                .text()
                .await
                .ok()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| response.status_text());
            return Err(AppError::Http { status, message });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Parse(e.to_string()))
    }
}

impl OpportunitySource for ApiClient {
    async fn fetch_page(&self, url: &str) -> Result<SearchPage, AppError> {
        log::debug!("🌐 GET {}", url);
        let response = Request::get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        Self::decode::<SearchPage>(response).await
    }
}

impl FavoritesBackend for ApiClient {
    async fn fetch_saved(&self, token: &str) -> Result<Vec<SavedOpportunityRecord>, AppError> {
        let url = self.backend_endpoint("/opportunities/saved")?;
        let response = Request::get(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        let body = Self::decode::<SavedOpportunitiesResponse>(response).await?;
        Ok(body.opportunities)
    }

    async fn save(&self, token: &str, request: &SaveOpportunityRequest) -> Result<(), AppError> {
        let url = self.backend_endpoint("/opportunities/save")?;
        let response = Request::post(&url)
            .header("Authorization", &format!("Bearer {}", token))
            .json(request)
            .map_err(|e| AppError::Parse(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            Err(AppError::Http {
                status: response.status(),
                message: response.status_text(),
            })
        }
    }
}

impl GeocodingBackend for ApiClient {
    async fn search_places(&self, query: &str) -> Result<Vec<PlaceCandidate>, AppError> {
        let token = self.config.mapbox_token()?;
        let encoded: String = js_sys::encode_uri_component(query).into();
        let url = format!(
            "{}/{}.json?access_token={}&limit={}",
            GEOCODING_API_URL, encoded, token, GEOCODING_RESULT_LIMIT
        );
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        let body = Self::decode::<GeocodingResponse>(response).await?;
        Ok(body.features)
    }
}
