pub mod store;

pub use store::{
    CorruptFavoritesPolicy, FavoritesChange, FavoritesChangeKind, FavoritesStore,
    FavoritesSubscription, DEFAULT_FAVORITES_KEY,
};
