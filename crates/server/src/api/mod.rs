pub mod agent;
pub mod demo;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod runs;
pub mod tools;

pub use routes::create_router;
