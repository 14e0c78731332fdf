//! Infrastructure: concrete adapters for the ports the domain depends on,
//! plus ambient process concerns (configuration, logging).

pub mod config;
pub mod logging;
pub mod worker;
