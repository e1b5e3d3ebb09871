pub mod favorites_viewmodel;
pub mod search_viewmodel;
pub mod swipe_viewmodel;

pub use favorites_viewmodel::{FavoritesPanel, FavoritesViewModel};
pub use search_viewmodel::SearchViewModel;
pub use swipe_viewmodel::{SwipeCard, SwipeOutcome, SwipeViewModel};
