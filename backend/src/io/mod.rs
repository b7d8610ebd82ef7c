//! Interface layer: HTTP REST surface.

pub mod rest;
