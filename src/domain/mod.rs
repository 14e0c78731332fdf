//! The domain layer: graph/entity/action models and the ports they depend
//! on. Pure and synchronous; everything async lives in `application`.

pub mod models;
pub mod ports;
