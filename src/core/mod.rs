//! Core business logic: price storage, conversions and the swap form

pub mod config;
pub mod convert;
pub mod log;
pub mod price;
pub mod store;
pub mod swap;

// Re-export main types for cleaner imports
pub use convert::ConversionRequest;
pub use price::{PriceObservation, PriceSource};
pub use store::PriceStore;
pub use swap::{SwapExecutor, SwapForm, SwapPhase};
