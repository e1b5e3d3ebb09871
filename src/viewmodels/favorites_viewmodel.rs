// ============================================================================
// FAVORITES VIEWMODEL - Datos del panel de favoritos
// ============================================================================

use serde::Serialize;
use crate::state::{FavoritesStore, FavoritesView, OpportunityStore};

/// Todo lo que pinta el panel de favoritos
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FavoritesPanel {
    pub view: FavoritesView,
    pub count: usize,
    /// Se muestra como botón de reintento en modo remoto
    pub can_reload: bool,
    pub sync_error: Option<String>,
}

pub struct FavoritesViewModel {
    favorites: FavoritesStore,
    opportunities: OpportunityStore,
}

impl FavoritesViewModel {
    pub fn new(favorites: FavoritesStore, opportunities: OpportunityStore) -> Self {
        Self { favorites, opportunities }
    }

    pub fn panel(&self) -> FavoritesPanel {
        FavoritesPanel {
            view: self.favorites.view(),
            count: self.favorites.count(),
            can_reload: self.favorites.is_remote(),
            sync_error: self.favorites.get_last_sync_error(),
        }
    }

    /// Clic en un favorito: lo enfoca en el mapa y en el mazo si está
    /// entre los resultados actuales
    pub fn open_favorite(&self, opportunity_id: i64) -> bool {
        if !self.favorites.is_favorite(opportunity_id) {
            return false;
        }
        self.opportunities.select_by_id(opportunity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Opportunity;

    fn opp(id: i64) -> Opportunity {
        Opportunity { id, ..Default::default() }
    }

    #[test]
    fn local_panel_cannot_reload() {
        let favorites = FavoritesStore::new();
        let vm = FavoritesViewModel::new(favorites.clone(), OpportunityStore::with_preferences(25, false));
        favorites.add_favorite(opp(1));

        let panel = vm.panel();
        assert_eq!(panel.count, 1);
        assert!(!panel.can_reload);
        assert_eq!(panel.view, FavoritesView::Items(vec![opp(1)]));
    }

    #[test]
    fn failed_remote_panel_offers_retry() {
        let favorites = FavoritesStore::new();
        let vm = FavoritesViewModel::new(favorites.clone(), OpportunityStore::with_preferences(25, false));
        let request = favorites.start_remote_session(1);
        favorites.apply_remote_result(request, Err(AppError::Network("down".to_string())));

        let panel = vm.panel();
        assert!(panel.can_reload);
        assert!(matches!(panel.view, FavoritesView::FetchFailed(_)));
    }

    #[test]
    fn open_favorite_selects_when_in_results() {
        let favorites = FavoritesStore::new();
        let store = OpportunityStore::with_preferences(25, false);
        store.set_opportunities(vec![opp(1), opp(2)]);
        let vm = FavoritesViewModel::new(favorites.clone(), store.clone());

        favorites.add_favorite(opp(2));
        favorites.add_favorite(opp(9));
        assert!(vm.open_favorite(2));
        assert_eq!(store.selected_id(), Some(2));
        assert!(!vm.open_favorite(9));
        assert!(!vm.open_favorite(1));
    }
}
