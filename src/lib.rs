// src/lib.rs

pub mod config;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod state;
