pub mod hop;
pub mod traits;

pub use hop::HopClient;
pub use traits::*;
