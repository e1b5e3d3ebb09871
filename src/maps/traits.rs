use serde::Serialize;
use crate::models::Opportunity;

/// Trait común para superficies de mapa. La build web habla con Mapbox GL JS,
/// los tests usan un registrador en memoria.
pub trait MapRenderer {
    /// Crear el marcador de una oportunidad mapeable
    fn add_opportunity_marker(&mut self, marker: &OpportunityMarker) -> Result<(), MapError>;

    fn remove_opportunity_marker(&mut self, opportunity_id: i64) -> Result<(), MapError>;

    /// Movimiento animado de cámara hacia una ubicación buscada
    fn fly_to(&mut self, target: CameraTarget) -> Result<(), MapError>;

    /// Movimiento corto de cámara para mantener visible la oportunidad seleccionada
    fn ease_to(&mut self, coordinates: Coordinates) -> Result<(), MapError>;

    fn is_ready(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub center: Coordinates,
    pub zoom: f64,
    pub duration_ms: u32,
}

/// Payload enviado al mapa para un marcador
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityMarker {
    pub id: i64,
    pub title: String,
    pub organization: String,
    /// [lng, lat]
    pub coords: [f64; 2],
}

impl OpportunityMarker {
    /// None para oportunidades no mapeables
    pub fn from_opportunity(opportunity: &Opportunity) -> Option<Self> {
        let (lng, lat) = opportunity.coordinates()?;
        Some(Self {
            id: opportunity.id,
            title: opportunity.title.clone(),
            organization: opportunity.organization.name.clone(),
            coords: [lng, lat],
        })
    }
}

/// Error del mapa
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    NotReady,
    InvalidCoordinates,
    Unknown(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::NotReady => write!(f, "Map is not ready"),
            MapError::InvalidCoordinates => write!(f, "Invalid coordinates"),
            MapError::Unknown(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}
