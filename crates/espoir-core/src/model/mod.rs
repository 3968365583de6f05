// ── Domain model ──

mod movie;
mod theme;
mod user;

pub use movie::{Genre, Movie, MovieId};
pub use theme::ThemeMode;
pub use user::User;
