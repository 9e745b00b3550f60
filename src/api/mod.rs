//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the WebSocket fan-out, a small REST surface and the
//! admin/viewer pages.

pub mod http;
pub mod rest;
pub mod websocket;
