// ============================================================================
// SWIPE VIEWMODEL - Mazo de swipe sobre la lista filtrada
// ============================================================================
// Conecta la máquina de gestos SwipeSession con los stores:
//  - cambiar el filtro o reemplazar la lista pone el cursor en 0
//  - una selección externa (clic en marcador) mueve el cursor
//  - mover el cursor escribe la selección del store, solo si cambió el id
// No se mantiene ningún borrow de RefCell al llamar a un store, así los
// suscriptores pueden volver a llamar a este view model.
// ============================================================================

use std::cell::RefCell;
use serde::Serialize;
use crate::models::Opportunity;
use crate::state::{
    FavoritesStore, GestureRelease, OpportunityStore, SwipeDecision, SwipeDirection, SwipePhase,
    SwipeSession,
};

/// Datos para pintar la carta de arriba del mazo
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SwipeCard {
    pub opportunity: Opportunity,
    pub index: usize,
    pub total: usize,
    pub phase: SwipePhase,
    pub drag_offset: f64,
    pub exit_direction: Option<SwipeDirection>,
    /// False en la última carta: los botones save/skip están desactivados
    pub can_advance: bool,
    pub is_favorite: bool,
}

impl SwipeCard {
    /// "3 of 12"
    pub fn position_label(&self) -> String {
        format!("{} of {}", self.index + 1, self.total)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SwipeOutcome {
    /// Mazo vacío o sin gesto en curso
    Ignored,
    Dragging(f64),
    SnappedBack,
    /// La carta está saliendo; llamar a `finish_exit(exit_id)` tras la animación.
    /// `newly_saved` viene relleno si un save añadió un favorito que quizá haya que persistir.
    Exiting {
        direction: SwipeDirection,
        exit_id: u64,
        newly_saved: Option<Opportunity>,
    },
    /// Botón save/skip en la última carta
    Disabled,
    /// Arrastre a la derecha en la última carta: favorito añadido, sin salida
    SavedAtEnd { newly_saved: Option<Opportunity> },
}

pub struct SwipeViewModel {
    opportunities: OpportunityStore,
    favorites: FavoritesStore,
    session: RefCell<SwipeSession>,
    last_synced_id: RefCell<Option<i64>>,
    last_hide_remote: RefCell<bool>,
    last_list_version: RefCell<u64>,
}

impl SwipeViewModel {
    pub fn new(opportunities: OpportunityStore, favorites: FavoritesStore) -> Self {
        let hide_remote = opportunities.get_hide_remote_opportunities();
        let list_version = opportunities.get_list_version();
        let vm = Self {
            opportunities,
            favorites,
            session: RefCell::new(SwipeSession::new()),
            last_synced_id: RefCell::new(None),
            last_hide_remote: RefCell::new(hide_remote),
            last_list_version: RefCell::new(list_version),
        };
        vm.sync();
        vm
    }

    /// Reconciliar la sesión con los stores. Se llama antes de cada operación;
    /// el shell web también lo llama desde las suscripciones.
    pub fn sync(&self) {
        let deck = self.opportunities.filtered_opportunities();
        let len = deck.len();

        let hide_remote = self.opportunities.get_hide_remote_opportunities();
        let list_version = self.opportunities.get_list_version();
        let filter_changed = self.last_hide_remote.replace(hide_remote) != hide_remote;
        let list_changed = self.last_list_version.replace(list_version) != list_version;

        if filter_changed || list_changed {
            log::debug!("🔄 Mazo reiniciado ({} cartas)", len);
            self.session.borrow_mut().reset_cursor();
            // El reinicio gana sobre lo que estuviera seleccionado antes
            *self.last_synced_id.borrow_mut() = self.opportunities.selected_id();
        } else {
            self.session.borrow_mut().clamp_to(len);
            self.follow_external_selection(&deck);
        }

        self.push_selection(&deck);
    }

    /// Selección del store -> cursor, si cambió y está en el mazo
    fn follow_external_selection(&self, deck: &[Opportunity]) {
        let len = deck.len();
        if let Some(selected_id) = self.opportunities.selected_id() {
            let already_synced = *self.last_synced_id.borrow() == Some(selected_id);
            if !already_synced {
                if let Some(index) = deck.iter().position(|o| o.id == selected_id) {
                    log::debug!("🎯 El mazo salta a la carta {} (oportunidad {})", index, selected_id);
                    self.session.borrow_mut().jump_to(index, len);
                    *self.last_synced_id.borrow_mut() = Some(selected_id);
                }
            }
        }
    }

    /// Cursor interno -> selección del store
    fn push_selection(&self, deck: &[Opportunity]) {
        let index = self.session.borrow().cursor_index();
        let Some(current) = deck.get(index) else {
            return;
        };
        let moved = *self.last_synced_id.borrow() != Some(current.id);
        if !moved {
            return;
        }
        *self.last_synced_id.borrow_mut() = Some(current.id);
        if self.opportunities.selected_id() != Some(current.id) {
            self.opportunities.set_selected_opportunity(Some(current.clone()));
        }
    }

    fn deck(&self) -> Vec<Opportunity> {
        self.sync();
        self.opportunities.filtered_opportunities()
    }

    fn card_at_cursor(&self, deck: &[Opportunity]) -> Option<Opportunity> {
        deck.get(self.session.borrow().cursor_index()).cloned()
    }

    fn add_favorite(&self, opportunity: &Opportunity) -> Option<Opportunity> {
        self.favorites
            .add_favorite(opportunity.clone())
            .then(|| opportunity.clone())
    }

    // ----------------------------------------------------------- gestures

    pub fn pointer_down(&self, x: f64) -> SwipeOutcome {
        let len = self.deck().len();
        if self.session.borrow_mut().pointer_down(x, len) {
            SwipeOutcome::Dragging(0.0)
        } else {
            SwipeOutcome::Ignored
        }
    }

    /// Los moves no resincronizan: un arrastre solo sigue a su puntero
    pub fn pointer_move(&self, x: f64) -> SwipeOutcome {
        match self.session.borrow_mut().pointer_move(x) {
            Some(offset) => SwipeOutcome::Dragging(offset),
            None => SwipeOutcome::Ignored,
        }
    }

    pub fn pointer_up(&self) -> SwipeOutcome {
        let deck = self.deck();
        let release = self.session.borrow_mut().pointer_up(deck.len());
        let card = self.card_at_cursor(&deck);

        match release {
            GestureRelease::Ignored => SwipeOutcome::Ignored,
            GestureRelease::SnappedBack | GestureRelease::BlockedAtEnd(SwipeDirection::Left) => {
                SwipeOutcome::SnappedBack
            }
            GestureRelease::BlockedAtEnd(SwipeDirection::Right) => SwipeOutcome::SavedAtEnd {
                newly_saved: card.as_ref().and_then(|c| self.add_favorite(c)),
            },
            GestureRelease::Exiting { direction, exit_id } => {
                let newly_saved = match (direction.decision(), card.as_ref()) {
                    (SwipeDecision::Save, Some(c)) => self.add_favorite(c),
                    _ => None,
                };
                SwipeOutcome::Exiting { direction, exit_id, newly_saved }
            }
        }
    }

    /// El puntero salió de la carta: vuelta a reposo, sin decisión
    pub fn pointer_cancel(&self) -> SwipeOutcome {
        if self.session.borrow_mut().pointer_cancel() {
            SwipeOutcome::SnappedBack
        } else {
            SwipeOutcome::Ignored
        }
    }

    // ------------------------------------------------------------ buttons

    pub fn save(&self) -> SwipeOutcome {
        self.decide(SwipeDecision::Save)
    }

    pub fn skip(&self) -> SwipeOutcome {
        self.decide(SwipeDecision::Skip)
    }

    fn decide(&self, decision: SwipeDecision) -> SwipeOutcome {
        let deck = self.deck();
        if deck.is_empty() {
            return SwipeOutcome::Ignored;
        }
        let Some(exit_id) = self.session.borrow_mut().begin_exit(decision, deck.len()) else {
            return SwipeOutcome::Disabled;
        };
        let newly_saved = match (decision, self.card_at_cursor(&deck)) {
            (SwipeDecision::Save, Some(c)) => self.add_favorite(&c),
            _ => None,
        };
        SwipeOutcome::Exiting {
            direction: decision.direction(),
            exit_id,
            newly_saved,
        }
    }

    /// Fin de la animación de salida. Devuelve false para salidas obsoletas.
    pub fn finish_exit(&self, exit_id: u64) -> bool {
        let deck = self.deck();
        let finished = self.session.borrow_mut().finish_exit(exit_id, deck.len());
        if finished {
            self.push_selection(&deck);
        }
        finished
    }

    // -------------------------------------------------------------- views

    /// None si el mazo filtrado está vacío
    pub fn current_card(&self) -> Option<SwipeCard> {
        let deck = self.deck();
        let session = self.session.borrow().clone();
        let opportunity = deck.get(session.cursor_index())?.clone();
        let is_favorite = self.favorites.is_favorite(opportunity.id);
        Some(SwipeCard {
            index: session.cursor_index(),
            total: deck.len(),
            phase: session.phase(),
            drag_offset: session.drag_offset(),
            exit_direction: session.exit_direction(),
            can_advance: session.can_advance(deck.len()),
            is_favorite,
            opportunity,
        })
    }

    pub fn cursor_index(&self) -> usize {
        self.session.borrow().cursor_index()
    }

    pub fn phase(&self) -> SwipePhase {
        self.session.borrow().phase()
    }
}
