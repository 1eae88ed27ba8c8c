//! Domain values returned by the client query services.

pub mod client;
