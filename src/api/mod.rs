mod handlers;
mod routes;
mod state;

pub use handlers::{
    HealthResponse, MessageResponse, MoviesResponse, RecommendRequest, RecommendResponse,
};
pub use routes::create_router;
pub use state::AppState;
