pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod routes;
pub mod services;
