//! Wire shapes of backend responses.

pub mod provider_configs;
pub mod users;
