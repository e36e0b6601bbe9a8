//! Pipeline stage services

pub mod chart_service;
pub mod fetch_service;
pub mod publish_service;
