//! # Atlas API Server Library
//!
//! This library provides the core functionality for the Atlas directory
//! API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `oauth`: OAuth account linking and provisioning
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod oauth;
pub mod routes;
