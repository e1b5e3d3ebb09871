// ============================================================================
// MARKER LAYER - Ciclo de vida de los marcadores sobre un MapRenderer
// ============================================================================
// Un marcador por id de oportunidad mapeable. Publicar el mismo id dos veces
// no hace nada, así la publicación página a página nunca duplica marcadores.
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeSet;
use crate::models::Opportunity;
use super::{CameraTarget, Coordinates, MapError, MapRenderer, OpportunityMarker};

pub struct MarkerLayer<R: MapRenderer> {
    renderer: RefCell<R>,
    marker_ids: RefCell<BTreeSet<i64>>,
}

impl<R: MapRenderer> MarkerLayer<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer: RefCell::new(renderer),
            marker_ids: RefCell::new(BTreeSet::new()),
        }
    }

    /// Añadir marcadores para las entradas mapeables que aún no están en el mapa.
    /// Devuelve cuántos marcadores se crearon.
    pub fn publish(&self, opportunities: &[Opportunity]) -> usize {
        let mut created = 0;
        let mut renderer = self.renderer.borrow_mut();
        let mut ids = self.marker_ids.borrow_mut();

        for opportunity in opportunities {
            let Some(marker) = OpportunityMarker::from_opportunity(opportunity) else {
                continue;
            };
            if ids.contains(&marker.id) {
                continue;
            }
            match renderer.add_opportunity_marker(&marker) {
                Ok(()) => {
                    ids.insert(marker.id);
                    created += 1;
                }
                Err(e) => log::warn!("⚠️ Marcador de la oportunidad {} no creado: {}", marker.id, e),
            }
        }

        if created > 0 {
            log::debug!("📍 {} marcadores creados ({} en el mapa)", created, ids.len());
        }
        created
    }

    pub fn remove(&self, opportunity_id: i64) -> bool {
        if !self.marker_ids.borrow_mut().remove(&opportunity_id) {
            return false;
        }
        if let Err(e) = self.renderer.borrow_mut().remove_opportunity_marker(opportunity_id) {
            log::warn!("⚠️ No se pudo eliminar el marcador {}: {}", opportunity_id, e);
        }
        true
    }

    /// Eliminar todos los marcadores (nueva sesión de búsqueda)
    pub fn clear(&self) {
        let ids: Vec<i64> = std::mem::take(&mut *self.marker_ids.borrow_mut())
            .into_iter()
            .collect();
        let mut renderer = self.renderer.borrow_mut();
        for id in &ids {
            if let Err(e) = renderer.remove_opportunity_marker(*id) {
                log::warn!("⚠️ No se pudo eliminar el marcador {}: {}", id, e);
            }
        }
        if !ids.is_empty() {
            log::info!("🧹 {} marcadores eliminados", ids.len());
        }
    }

    pub fn contains(&self, opportunity_id: i64) -> bool {
        self.marker_ids.borrow().contains(&opportunity_id)
    }

    pub fn len(&self) -> usize {
        self.marker_ids.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.marker_ids.borrow().is_empty()
    }

    pub fn fly_to(&self, target: CameraTarget) -> Result<(), MapError> {
        if !target.center.longitude.is_finite() || !target.center.latitude.is_finite() {
            return Err(MapError::InvalidCoordinates);
        }
        self.renderer.borrow_mut().fly_to(target)
    }

    /// Mantener visible la oportunidad seleccionada. Las no mapeables se ignoran.
    pub fn focus(&self, opportunity: &Opportunity) -> Result<(), MapError> {
        match opportunity.coordinates() {
            Some((longitude, latitude)) => self
                .renderer
                .borrow_mut()
                .ease_to(Coordinates { longitude, latitude }),
            None => Ok(()),
        }
    }

    /// Acceso de solo lectura al renderer
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.renderer.borrow())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Audience, Opportunity};

    /// Mapa en memoria que registra cada llamada
    #[derive(Default)]
    pub struct RecordingMap {
        pub added: Vec<i64>,
        pub removed: Vec<i64>,
        pub flights: Vec<CameraTarget>,
        pub eases: Vec<Coordinates>,
        pub fail_adds: bool,
    }

    impl MapRenderer for RecordingMap {
        fn add_opportunity_marker(&mut self, marker: &OpportunityMarker) -> Result<(), MapError> {
            if self.fail_adds {
                return Err(MapError::NotReady);
            }
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

        fn ease_to(&mut self, coordinates: Coordinates) -> Result<(), MapError> {
            self.eases.push(coordinates);
            Ok(())
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    pub fn opportunity(id: i64, mappable: bool) -> Opportunity {
        Opportunity {
            id,
            title: format!("Opportunity {}", id),
            audience: Audience {
                scope: "local".to_string(),
                longitude: mappable.then_some(-114.0 - id as f64 * 0.01),
                latitude: mappable.then_some(51.0),
            },
            ..Default::default()
        }
    }

    #[test]
    fn publish_skips_unmappable_and_duplicates() {
        let layer = MarkerLayer::new(RecordingMap::default());
        let page = vec![opportunity(1, true), opportunity(2, false), opportunity(3, true)];

        assert_eq!(layer.publish(&page), 2);
        assert_eq!(layer.publish(&page), 0);
        assert_eq!(layer.len(), 2);
        assert!(!layer.contains(2));
        layer.with_renderer(|map| assert_eq!(map.added, vec![1, 3]));
    }

    #[test]
    fn failed_adds_are_not_tracked() {
        let layer = MarkerLayer::new(RecordingMap { fail_adds: true, ..Default::default() });
        assert_eq!(layer.publish(&[opportunity(1, true)]), 0);
        assert!(layer.is_empty());
    }

    #[test]
    fn clear_removes_every_marker() {
        let layer = MarkerLayer::new(RecordingMap::default());
        layer.publish(&[opportunity(1, true), opportunity(2, true)]);
        layer.clear();

        assert!(layer.is_empty());
        layer.with_renderer(|map| assert_eq!(map.removed, vec![1, 2]));
    }

    #[test]
    fn remove_unknown_marker_is_noop() {
        let layer = MarkerLayer::new(RecordingMap::default());
        assert!(!layer.remove(99));
        layer.with_renderer(|map| assert!(map.removed.is_empty()));
    }

    #[test]
    fn focus_ignores_remote_opportunities() {
        let layer = MarkerLayer::new(RecordingMap::default());
        layer.focus(&opportunity(1, false)).unwrap();
        layer.focus(&opportunity(2, true)).unwrap();
        layer.with_renderer(|map| assert_eq!(map.eases.len(), 1));
    }

    #[test]
    fn fly_to_rejects_nan() {
        let layer = MarkerLayer::new(RecordingMap::default());
        let target = CameraTarget {
            center: Coordinates { longitude: f64::NAN, latitude: 51.0 },
            zoom: 14.0,
            duration_ms: 2000,
        };
        assert_eq!(layer.fly_to(target), Err(MapError::InvalidCoordinates));
    }
}
