// ── State stores ──
//
// Each store owns one slice of the state tree and is the only code
// permitted to mutate it. Mutations are pure transitions applied
// atomically through the shared `StateCell`; I/O happens between
// transitions, with generation tags discarding superseded results.

mod catalog;
mod cell;
mod favorites;
mod generation;
mod session;
mod theme;

pub use catalog::CatalogStore;
pub use favorites::FavoritesStore;
pub use session::SessionStore;
pub use theme::ThemeStore;

pub(crate) use cell::StateCell;
pub(crate) use generation::Generation;
