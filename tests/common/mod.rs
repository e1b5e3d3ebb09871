#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use voluntr::error::AppError;
use voluntr::maps::{CameraTarget, Coordinates, MapError, MapRenderer, OpportunityMarker};
use voluntr::models::{Audience, Opportunity, SearchPage};
use voluntr::services::OpportunitySource;

pub const API: &str = "https://api.example.org";

/// Superficie de mapa que solo registra llamadas
#[derive(Default)]
pub struct RecordingMap {
    pub added: Vec<i64>,
    pub removed: Vec<i64>,
    pub flights: Vec<CameraTarget>,
}

impl MapRenderer for RecordingMap {
    fn add_opportunity_marker(&mut self, marker: &OpportunityMarker) -> Result<(), MapError> {
        self.added.push(marker.id);
        Ok(())
    }

    fn remove_opportunity_marker(&mut self, opportunity_id: i64) -> Result<(), MapError> {
        self.removed.push(opportunity_id);
        Ok(())
    }

    fn fly_to(&mut self, target: CameraTarget) -> Result<(), MapError> {
        self.flights.push(target);
        Ok(())
    }

    fn ease_to(&mut self, _coordinates: Coordinates) -> Result<(), MapError> {
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }
}

pub fn local(id: i64) -> Opportunity {
    Opportunity {
        id,
        title: format!("Local {}", id),
        audience: Audience {
            scope: "local".to_string(),
            longitude: Some(-114.0 - id as f64 * 0.001),
            latitude: Some(51.0 + id as f64 * 0.001),
        },
        ..Default::default()
    }
}

pub fn remote(id: i64) -> Opportunity {
    Opportunity {
        id,
        title: format!("Remote {}", id),
        remote_or_online: true,
        ..Default::default()
    }
}

/// Páginas servidas por URL; un hook puede ejecutarse antes de responder una URL
#[derive(Default)]
pub struct PagedSource {
    pub pages: HashMap<String, Result<SearchPage, AppError>>,
    pub requested: RefCell<Vec<String>>,
    pub before_fetch: RefCell<HashMap<String, Box<dyn Fn()>>>,
}

impl PagedSource {
    /// Cadena de páginas: la primera en `first_url`, el resto en `{API}/api/search/?page=N`
    pub fn chain(first_url: &str, pages: Vec<Vec<Opportunity>>) -> Self {
        let mut source = PagedSource::default();
        let count = pages.len();
        for (i, results) in pages.into_iter().enumerate() {
            let url = if i == 0 {
                first_url.to_string()
            } else {
                page_url(i + 1)
            };
            let next = (i + 1 < count).then(|| page_url(i + 2));
            source.pages.insert(
                url,
                Ok(SearchPage {
                    count: None,
                    next,
                    previous: None,
                    results,
                }),
            );
        }
        source
    }

    pub fn on_fetch(&self, url: &str, hook: impl Fn() + 'static) {
        self.before_fetch.borrow_mut().insert(url.to_string(), Box::new(hook));
    }
}

pub fn page_url(n: usize) -> String {
    format!("{}/api/search/?page={}", API, n)
}

impl OpportunitySource for PagedSource {
    async fn fetch_page(&self, url: &str) -> Result<SearchPage, AppError> {
        self.requested.borrow_mut().push(url.to_string());
        if let Some(hook) = self.before_fetch.borrow().get(url) {
            hook();
        }
        self.pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(AppError::Http { status: 404, message: url.to_string() }))
    }
}
