pub mod acquire;

pub use acquire::{AcquireForm, AcquireResponse};
