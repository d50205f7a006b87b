pub mod batch;
pub mod models;
pub mod response;
pub mod routes;
