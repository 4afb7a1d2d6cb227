//! HTTP route handlers

pub mod ai;
pub mod games;
pub mod status;
