//! Actix middleware shared by every inbound surface.

pub mod trace;
