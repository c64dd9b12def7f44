pub mod logger;
pub mod metrics;

pub use logger::*;
pub use metrics::*;
