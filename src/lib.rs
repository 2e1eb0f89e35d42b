//! Employee attendance (presensi) API: registration and login with signed
//! session tokens, and per-day entry/exit records with location.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod utils;
