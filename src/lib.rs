pub mod app;
pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod links;
pub mod loader;
pub mod models;
pub mod scanner;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use loader::SnapshotLoader;
pub use scanner::scan;
pub use state::AppState;
