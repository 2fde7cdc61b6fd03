mod engine;
mod memory;
mod error;

pub use engine::ExchangeCore;
pub use memory::{Clock, MemoryCore};
pub use error::{CoreError, Result};

#[cfg(test)]
mod tests;
