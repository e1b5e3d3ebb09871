use serde::{Deserialize, Deserializer, Serialize};

/// Un `null` explícito se lee igual que una clave ausente
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Organización que publica la oportunidad
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct Organization {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// Bloque audience. Solo las oportunidades con ubicación tienen coordenadas.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct Audience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: String,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct DateRange {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end: String,
}

impl DateRange {
    /// Separar un rango en texto libre ("Jan 1, 2025 - Jan 5, 2025") en inicio/fin.
    /// Si no hay exactamente dos partes, ambos extremos quedan con el texto original.
    pub fn from_free_text(raw: &str) -> Self {
        for separator in [" - ", " – "] {
            let parts: Vec<&str> = raw.split(separator).collect();
            if parts.len() == 2 {
                return Self {
                    start: parts[0].trim().to_string(),
                    end: parts[1].trim().to_string(),
                };
            }
        }

        Self {
            start: raw.to_string(),
            end: raw.to_string(),
        }
    }
}

/// Una oportunidad de voluntariado
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct Opportunity {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization: Organization,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remote_or_online: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audience: Audience,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: DateRange,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl Opportunity {
    /// Mapeable = no remota/online y con ambas coordenadas
    pub fn is_mappable(&self) -> bool {
        !self.remote_or_online
            && self.audience.longitude.is_some()
            && self.audience.latitude.is_some()
    }

    /// (longitud, latitud) para el mapa, solo si es mapeable
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if !self.is_mappable() {
            return None;
        }
        match (self.audience.longitude, self.audience.latitude) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }
}
