// Pokeproxy Library

pub mod cache;
pub mod coalescing; // Opt-in miss coalescing
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod server;
pub mod service;
pub mod upstream;
pub mod validator;
