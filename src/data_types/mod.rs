pub mod config;
pub mod observation;

pub use config::*;
pub use observation::*;
