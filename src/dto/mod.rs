//! DTOs de la API
//!
//! Requests y responses en JSON (camelCase).

pub mod auth_dto;
pub mod booking_dto;
pub mod vehicle_dto;
