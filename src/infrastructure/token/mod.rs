//! Token sources for cache busting

mod random;

pub use random::RandomTokenSource;
