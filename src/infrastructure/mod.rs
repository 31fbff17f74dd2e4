//! Infrastructure layer - transports, token sources and logging

pub mod logging;
pub mod token;
pub mod transport;

pub use token::RandomTokenSource;
pub use transport::TransportFactory;
