pub mod credentials;
pub mod hosts;
pub mod service;
pub mod zones;
