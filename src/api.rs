pub mod bluesky;
mod client;
pub mod cronitor;
pub mod energy_zero;
pub mod telegram;
