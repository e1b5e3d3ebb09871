pub mod opportunity;
pub mod saved;
pub mod search;

pub use opportunity::{Audience, DateRange, Opportunity, Organization};
pub use saved::{SaveOpportunityRequest, SavedOpportunitiesResponse, SavedOpportunityRecord};
pub use search::{GeocodingResponse, PlaceCandidate, PlaceContext, SearchOutcome, SearchPage, SearchRequest};
