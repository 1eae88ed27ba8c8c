//! Inbound request payloads and their validation rules.

pub mod filter;
