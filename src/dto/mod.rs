//! DTO modules that shape JSON response bodies.

pub mod api;
