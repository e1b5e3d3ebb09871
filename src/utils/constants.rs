/// URL base de la API de búsqueda de oportunidades.
/// Se puede sobrescribir en compilación con OPPORTUNITIES_API_URL.
pub const OPPORTUNITIES_API_URL: &str = "https://www.volunteerconnector.org";

/// Endpoint de geocoding de Mapbox
pub const GEOCODING_API_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";
pub const GEOCODING_RESULT_LIMIT: u32 = 5;
pub const GEOCODING_MIN_QUERY_LEN: usize = 2;

// Límites del slider de radio de búsqueda (km)
pub const MIN_MAX_DISTANCE_KM: u32 = 5;
pub const MAX_MAX_DISTANCE_KM: u32 = 100;
pub const MAX_DISTANCE_STEP_KM: u32 = 5;
pub const DEFAULT_MAX_DISTANCE_KM: u32 = 25;

pub const DEFAULT_MAX_SEARCH_PAGES: u32 = 50;

// Mazo de swipe
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;
pub const SWIPE_EXIT_ANIMATION_MS: u32 = 300;

// Claves de localStorage
pub const PREF_MAX_DISTANCE_KEY: &str = "voluntr_max_distance_km";
pub const PREF_HIDE_REMOTE_KEY: &str = "voluntr_hide_remote";
