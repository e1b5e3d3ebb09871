use serde::{Deserialize, Serialize};
use super::opportunity::null_as_default;
use super::Opportunity;

/// Ubicación + radio de una sesión de búsqueda
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub postal_code: Option<String>,
    pub radius_km: u32,
}

impl SearchRequest {
    pub fn new(latitude: f64, longitude: f64, postal_code: Option<String>, radius_km: u32) -> Self {
        Self {
            latitude,
            longitude,
            postal_code,
            radius_km,
        }
    }

    /// Código postal realmente usable (no vacío)
    pub fn usable_postal_code(&self) -> Option<&str> {
        self.postal_code
            .as_deref()
            .map(str::trim)
            .filter(|pc| !pc.is_empty())
    }
}

/// Una página de la API de búsqueda de oportunidades
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct SearchPage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Opportunity>,
}

impl SearchPage {
    /// Enlace a la página siguiente; ignora los strings vacíos que algunas páginas mandan en vez de null
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Resultado de una ejecución del pipeline
#[derive(Clone, PartialEq, Debug)]
pub enum SearchOutcome {
    /// Resultados publicados en el store
    Completed { total: usize, mappable: usize, pages: u32 },
    /// Empezó una búsqueda más nueva mientras esta seguía en curso; no se publicó nada
    Superseded,
}

/// Candidato de geocoding (feature de Mapbox places)
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct PlaceCandidate {
    pub id: String,
    pub place_name: String,
    /// [longitud, latitud]
    pub center: [f64; 2],
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: Vec<PlaceContext>,
}

impl PlaceCandidate {
    pub fn longitude(&self) -> f64 {
        self.center[0]
    }

    pub fn latitude(&self) -> f64 {
        self.center[1]
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct PlaceContext {
    pub id: String,
    pub text: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct GeocodingResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<PlaceCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Audience, Organization};

    #[test]
    fn blank_postal_code_is_not_usable() {
        let request = SearchRequest::new(51.04, -114.07, Some("   ".to_string()), 25);
        assert_eq!(request.usable_postal_code(), None);

        let request = SearchRequest::new(51.04, -114.07, Some(" T3A5K9 ".to_string()), 25);
        assert_eq!(request.usable_postal_code(), Some("T3A5K9"));
    }

    #[test]
    fn page_without_next_link_is_last() {
        let page: SearchPage = serde_json::from_str(r#"{"count": 2, "next": null, "results": []}"#).unwrap();
        assert_eq!(page.next_url(), None);

        let page: SearchPage = serde_json::from_str(r#"{"next": "", "results": []}"#).unwrap();
        assert_eq!(page.next_url(), None);
    }

    #[test]
    fn null_fields_in_one_listing_keep_the_page() {
        let json = r#"{
            "count": 2,
            "next": null,
            "results": [
                {"id": 1, "title": "Park cleanup", "audience": {"scope": "local", "longitude": -114.1, "latitude": 51.0}},
                {"id": 2, "title": null, "description": null, "organization": null,
                 "audience": null, "dates": null, "remote_or_online": null,
                 "duration": null, "url": null}
            ]
        }"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);

        let sparse = &page.results[1];
        assert_eq!(sparse.id, 2);
        assert_eq!(sparse.title, "");
        assert_eq!(sparse.organization, Organization::default());
        assert_eq!(sparse.audience, Audience::default());
        assert!(!sparse.remote_or_online);
        assert!(!sparse.is_mappable());
        assert!(page.results[0].is_mappable());
    }

    #[test]
    fn geocoding_candidate_center_is_lng_lat() {
        let json = r#"{"features": [{
            "id": "place.1",
            "place_name": "Calgary, Alberta, Canada",
            "center": [-114.0719, 51.0447]
        }]}"#;
        let response: GeocodingResponse = serde_json::from_str(json).unwrap();
        let candidate = &response.features[0];
        assert_eq!(candidate.longitude(), -114.0719);
        assert_eq!(candidate.latitude(), 51.0447);
        assert!(candidate.context.is_empty());
    }
}
