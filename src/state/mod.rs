// ============================================================================
// STATE MODULE - Stores Rc<RefCell> con notificación de cambios
// ============================================================================

pub mod auth_state;
pub mod favorites_state;
pub mod opportunity_state;
pub mod swipe_state;

pub use auth_state::*;
pub use favorites_state::*;
pub use opportunity_state::*;
pub use swipe_state::*;
