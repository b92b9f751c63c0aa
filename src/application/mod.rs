//! Application layer: request admission and short-code allocation.

pub mod services;
