//! # Taskman API Server Library
//!
//! HTTP surface for the Taskman task-management system.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `schemas`: Request/response shapes and validating extractors
//! - `routes`: API route handlers
//! - `middleware`: Security headers
//! - `openapi`: OpenAPI document

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod schemas;
