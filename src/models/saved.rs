use serde::{Deserialize, Serialize};
use super::opportunity::null_as_default;
use super::{Audience, DateRange, Opportunity, Organization};

/// Oportunidad guardada tal como la devuelve el backend de favoritos
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SavedOpportunityRecord {
    /// Id local del servidor
    pub id: i64,
    /// Id original de la API de oportunidades
    #[serde(default)]
    pub api_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(default)]
    pub organization_logo: Option<String>,
    /// Rango en texto libre, p. ej. "Jan 1, 2025 - Jan 5, 2025"
    #[serde(default)]
    pub dates: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

impl SavedOpportunityRecord {
    /// Id de la API si existe, si no el id del servidor
    pub fn identity(&self) -> i64 {
        self.api_id.unwrap_or(self.id)
    }

    pub fn into_opportunity(self) -> Opportunity {
        let id = self.identity();
        let dates = self
            .dates
            .as_deref()
            .map(DateRange::from_free_text)
            .unwrap_or_default();

        Opportunity {
            id,
            title: self.title,
            description: self.description,
            organization: Organization {
                name: self.organization,
                logo: self.organization_logo,
            },
            remote_or_online: false,
            audience: Audience::default(),
            dates,
            duration: self.duration.unwrap_or_default(),
            url: self.url,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct SavedOpportunitiesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub opportunities: Vec<SavedOpportunityRecord>,
}

/// Cuerpo de POST /opportunities/save
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct SaveOpportunityRequest {
    pub api_id: i64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub organization: String,
    pub organization_logo: Option<String>,
    pub dates: Option<String>,
    pub duration: Option<String>,
}

impl From<&Opportunity> for SaveOpportunityRequest {
    fn from(opportunity: &Opportunity) -> Self {
        let dates = match (opportunity.dates.start.as_str(), opportunity.dates.end.as_str()) {
            ("", "") => None,
            (start, end) if start == end => Some(start.to_string()),
            (start, end) => Some(format!("{} - {}", start, end)),
        };

        Self {
            api_id: opportunity.id,
            title: opportunity.title.clone(),
            description: opportunity.description.clone(),
            url: opportunity.url.clone(),
            organization: opportunity.organization.name.clone(),
            organization_logo: opportunity.organization.logo.clone(),
            dates,
            duration: Some(opportunity.duration.clone()).filter(|d| !d.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, api_id: Option<i64>, dates: Option<&str>) -> SavedOpportunityRecord {
        SavedOpportunityRecord {
            id,
            api_id,
            title: "Trail cleanup".to_string(),
            description: String::new(),
            url: "https://example.org".to_string(),
            organization: "Parks Foundation".to_string(),
            organization_logo: None,
            dates: dates.map(str::to_string),
            duration: None,
        }
    }

    #[test]
    fn listing_id_wins_over_server_id() {
        assert_eq!(record(7, Some(9001), None).into_opportunity().id, 9001);
        assert_eq!(record(7, None, None).into_opportunity().id, 7);
    }

    #[test]
    fn dates_are_split_into_range() {
        let opp = record(1, None, Some("Jan 1, 2025 - Jan 5, 2025")).into_opportunity();
        assert_eq!(opp.dates.start, "Jan 1, 2025");
        assert_eq!(opp.dates.end, "Jan 5, 2025");

        let opp = record(1, None, Some("Ongoing")).into_opportunity();
        assert_eq!(opp.dates.start, "Ongoing");
        assert_eq!(opp.dates.end, "Ongoing");

        let opp = record(1, None, None).into_opportunity();
        assert_eq!(opp.dates, DateRange::default());
    }

    #[test]
    fn saved_records_are_never_mappable() {
        let opp = record(1, Some(2), None).into_opportunity();
        assert_eq!(opp.organization.name, "Parks Foundation");
        assert!(!opp.is_mappable());
    }

    #[test]
    fn save_request_rebuilds_free_text_dates() {
        let opp = Opportunity {
            id: 55,
            dates: DateRange { start: "Jan 1".to_string(), end: "Jan 5".to_string() },
            ..Default::default()
        };
        let request = SaveOpportunityRequest::from(&opp);
        assert_eq!(request.api_id, 55);
        assert_eq!(request.dates.as_deref(), Some("Jan 1 - Jan 5"));
        assert_eq!(request.duration, None);
    }
}
