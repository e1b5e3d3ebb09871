// ============================================================================
// SWIPE STATE - Máquina de estados de gestos del mazo
// ============================================================================
// Idle -> Dragging -> (Idle | Exiting) -> Idle
// La sesión solo conoce longitudes; qué oportunidad está en el cursor
// lo resuelve el SwipeViewModel.
// ============================================================================

use serde::Serialize;
use crate::utils::constants::SWIPE_THRESHOLD_PX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Decisión que representa la salida de una carta
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDecision {
    Save,
    Skip,
}

impl SwipeDecision {
    pub fn direction(self) -> SwipeDirection {
        match self {
            SwipeDecision::Save => SwipeDirection::Right,
            SwipeDecision::Skip => SwipeDirection::Left,
        }
    }
}

impl SwipeDirection {
    pub fn decision(self) -> SwipeDecision {
        match self {
            SwipeDirection::Right => SwipeDecision::Save,
            SwipeDirection::Left => SwipeDecision::Skip,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum SwipePhase {
    Idle,
    Dragging { start_x: f64 },
    /// `exit_id` identifica esta salida para que un timer tardío no cierre otra más nueva
    Exiting { direction: SwipeDirection, exit_id: u64 },
}

/// Resultado de soltar un arrastre
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureRelease {
    /// No se estaba arrastrando; no pasa nada
    Ignored,
    /// Bajo el umbral; el offset vuelve a cero
    SnappedBack,
    /// Pasado el umbral en la última carta: decisión tomada, sin salida
    BlockedAtEnd(SwipeDirection),
    Exiting { direction: SwipeDirection, exit_id: u64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwipeSession {
    cursor_index: usize,
    drag_offset: f64,
    phase: SwipePhase,
    exit_seq: u64,
}

impl SwipeSession {
    pub fn new() -> Self {
        Self {
            cursor_index: 0,
            drag_offset: 0.0,
            phase: SwipePhase::Idle,
            exit_seq: 0,
        }
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn drag_offset(&self) -> f64 {
        self.drag_offset
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    pub fn exit_direction(&self) -> Option<SwipeDirection> {
        match self.phase {
            SwipePhase::Exiting { direction, .. } => Some(direction),
            _ => None,
        }
    }

    /// Si un save/skip en el cursor puede avanzar el mazo
    pub fn can_advance(&self, len: usize) -> bool {
        len > 0 && self.cursor_index + 1 < len
    }

    // ----------------------------------------------------------- gestures

    pub fn pointer_down(&mut self, x: f64, len: usize) -> bool {
        if len == 0 || self.phase != SwipePhase::Idle {
            return false;
        }
        self.phase = SwipePhase::Dragging { start_x: x };
        self.drag_offset = 0.0;
        true
    }

    /// Devuelve el nuevo offset mientras se arrastra
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        match self.phase {
            SwipePhase::Dragging { start_x } => {
                self.drag_offset = x - start_x;
                Some(self.drag_offset)
            }
            _ => None,
        }
    }

    pub fn pointer_up(&mut self, len: usize) -> GestureRelease {
        if !matches!(self.phase, SwipePhase::Dragging { .. }) {
            return GestureRelease::Ignored;
        }

        let direction = if self.drag_offset > SWIPE_THRESHOLD_PX {
            SwipeDirection::Right
        } else if self.drag_offset < -SWIPE_THRESHOLD_PX {
            SwipeDirection::Left
        } else {
            self.snap_back();
            return GestureRelease::SnappedBack;
        };

        match self.start_exit(direction, len) {
            Some(exit_id) => GestureRelease::Exiting { direction, exit_id },
            None => {
                self.snap_back();
                GestureRelease::BlockedAtEnd(direction)
            }
        }
    }

    /// El puntero salió de la carta o el navegador canceló el gesto.
    /// Se descarta el arrastre sin decisión.
    pub fn pointer_cancel(&mut self) -> bool {
        if !matches!(self.phase, SwipePhase::Dragging { .. }) {
            return false;
        }
        self.snap_back();
        true
    }

    /// Save/skip programático desde Idle. None si está desactivado.
    pub fn begin_exit(&mut self, decision: SwipeDecision, len: usize) -> Option<u64> {
        if self.phase != SwipePhase::Idle {
            return None;
        }
        self.start_exit(decision.direction(), len)
    }

    fn start_exit(&mut self, direction: SwipeDirection, len: usize) -> Option<u64> {
        if !self.can_advance(len) {
            return None;
        }
        self.exit_seq += 1;
        self.phase = SwipePhase::Exiting { direction, exit_id: self.exit_seq };
        Some(self.exit_seq)
    }

    /// Fin de la animación de salida. Los ids viejos (salida interrumpida por un salto) se ignoran.
    pub fn finish_exit(&mut self, exit_id: u64, len: usize) -> bool {
        match self.phase {
            SwipePhase::Exiting { exit_id: current, .. } if current == exit_id => {
                if self.cursor_index + 1 < len {
                    self.cursor_index += 1;
                }
                self.snap_back();
                true
            }
            _ => false,
        }
    }

    fn snap_back(&mut self) {
        self.phase = SwipePhase::Idle;
        self.drag_offset = 0.0;
    }

    // ------------------------------------------------------------- cursor

    /// Saltar a `index`, descartando cualquier gesto en curso
    pub fn jump_to(&mut self, index: usize, len: usize) -> bool {
        if index >= len {
            return false;
        }
        self.cursor_index = index;
        self.snap_back();
        true
    }

    pub fn reset_cursor(&mut self) {
        self.cursor_index = 0;
        self.snap_back();
    }

    /// Mantener el cursor válido si la lista se acortó
    pub fn clamp_to(&mut self, len: usize) {
        if len == 0 {
            self.reset_cursor();
        } else if self.cursor_index >= len {
            self.cursor_index = len - 1;
            self.snap_back();
        }
    }
}

impl Default for SwipeSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(session: &mut SwipeSession, dx: f64, len: usize) -> GestureRelease {
        session.pointer_down(100.0, len);
        session.pointer_move(100.0 + dx);
        session.pointer_up(len)
    }

    #[test]
    fn short_drag_snaps_back() {
        let mut session = SwipeSession::new();
        assert_eq!(drag(&mut session, 30.0, 3), GestureRelease::SnappedBack);
        assert_eq!(session.phase(), SwipePhase::Idle);
        assert_eq!(session.drag_offset(), 0.0);
    }

    #[test]
    fn exactly_threshold_is_not_a_decision() {
        let mut session = SwipeSession::new();
        assert_eq!(drag(&mut session, 50.0, 3), GestureRelease::SnappedBack);
        assert_eq!(drag(&mut session, -50.0, 3), GestureRelease::SnappedBack);
    }

    #[test]
    fn drag_updates_offset_relative_to_start() {
        let mut session = SwipeSession::new();
        session.pointer_down(200.0, 2);
        assert_eq!(session.pointer_move(170.0), Some(-30.0));
        assert_eq!(session.drag_offset(), -30.0);
    }

    #[test]
    fn long_drag_exits_and_advances() {
        let mut session = SwipeSession::new();
        let release = drag(&mut session, -80.0, 3);
        let GestureRelease::Exiting { direction, exit_id } = release else {
            panic!("expected exit, got {:?}", release);
        };
        assert_eq!(direction, SwipeDirection::Left);
        assert_eq!(session.exit_direction(), Some(SwipeDirection::Left));

        assert!(session.finish_exit(exit_id, 3));
        assert_eq!(session.cursor_index(), 1);
        assert_eq!(session.exit_direction(), None);
        assert_eq!(session.drag_offset(), 0.0);
    }

    #[test]
    fn cancelled_drag_frees_the_next_gesture() {
        let mut session = SwipeSession::new();
        session.pointer_down(100.0, 3);
        session.pointer_move(190.0);
        assert!(session.pointer_cancel());
        assert_eq!(session.phase(), SwipePhase::Idle);
        assert_eq!(session.drag_offset(), 0.0);
        assert_eq!(session.cursor_index(), 0);

        assert!(session.pointer_down(50.0, 3));
        assert_eq!(session.pointer_move(60.0), Some(10.0));
        assert_eq!(session.pointer_up(3), GestureRelease::SnappedBack);
    }

    #[test]
    fn cancel_outside_a_drag_is_ignored() {
        let mut session = SwipeSession::new();
        assert!(!session.pointer_cancel());
        let exit_id = session.begin_exit(SwipeDecision::Skip, 3).unwrap();
        assert!(!session.pointer_cancel());
        assert!(session.finish_exit(exit_id, 3));
    }

    #[test]
    fn last_card_blocks_exit() {
        let mut session = SwipeSession::new();
        session.jump_to(2, 3);
        assert_eq!(drag(&mut session, 90.0, 3), GestureRelease::BlockedAtEnd(SwipeDirection::Right));
        assert_eq!(session.begin_exit(SwipeDecision::Skip, 3), None);
        assert_eq!(session.cursor_index(), 2);
        assert_eq!(session.phase(), SwipePhase::Idle);
    }

    #[test]
    fn empty_deck_ignores_gestures() {
        let mut session = SwipeSession::new();
        assert!(!session.pointer_down(0.0, 0));
        assert_eq!(session.pointer_up(0), GestureRelease::Ignored);
        assert_eq!(session.begin_exit(SwipeDecision::Save, 0), None);
    }

    #[test]
    fn jump_cancels_pending_exit() {
        let mut session = SwipeSession::new();
        let exit_id = session.begin_exit(SwipeDecision::Save, 5).unwrap();
        assert!(session.jump_to(3, 5));
        assert!(!session.finish_exit(exit_id, 5));
        assert_eq!(session.cursor_index(), 3);
    }

    #[test]
    fn jump_out_of_range_is_rejected() {
        let mut session = SwipeSession::new();
        assert!(!session.jump_to(4, 4));
        assert_eq!(session.cursor_index(), 0);
    }

    #[test]
    fn cursor_stays_in_bounds_for_any_sequence() {
        let len = 4;
        let mut session = SwipeSession::new();
        for step in 0..40 {
            match step % 5 {
                0 => {
                    if let Some(id) = session.begin_exit(SwipeDecision::Save, len) {
                        session.finish_exit(id, len);
                    }
                }
                1 => {
                    if let GestureRelease::Exiting { exit_id, .. } = drag(&mut session, -120.0, len) {
                        session.finish_exit(exit_id, len);
                    }
                }
                2 => {
                    session.jump_to(step % 7, len);
                }
                3 => {
                    if let Some(id) = session.begin_exit(SwipeDecision::Skip, len) {
                        session.finish_exit(id, len);
                    }
                }
                _ => session.clamp_to(len),
            }
            assert!(session.cursor_index() < len);
        }
    }

    #[test]
    fn clamp_after_shrink() {
        let mut session = SwipeSession::new();
        session.jump_to(5, 6);
        session.clamp_to(2);
        assert_eq!(session.cursor_index(), 1);
        session.clamp_to(0);
        assert_eq!(session.cursor_index(), 0);
    }
}
