mod health;
pub mod solve;
pub mod sse;
mod ws;

pub use health::*;
pub use solve::*;
pub use ws::*;
