//! HTTP service layer for mixwheel
//!
//! [`ServiceContext`] is built once at startup and shared by every handler;
//! [`RestApi`] serves it over actix-web.

pub mod context;
pub mod rest;

pub use context::ServiceContext;
pub use rest::{routes, RestApi};
