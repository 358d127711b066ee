pub mod app;
pub mod auth;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
