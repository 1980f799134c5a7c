pub mod dto;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod routes;
