pub mod errors;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_api_routes;
pub use server::serve;
pub use state::AppState;
