//! Infrastructure layer: external store integrations.

pub mod store;
