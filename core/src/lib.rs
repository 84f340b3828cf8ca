//! Round-based health-check task generation.
//!
//! A [`round::RoundController`] repeatedly walks every configured registry
//! with a [`generator::TaskGenerator`], hands one [`check::CheckTask`] per
//! unique endpoint to a [`pool::WorkerPool`], waits for the pool to drain and
//! sleeps until the next round.

pub mod address_set;
pub mod check;
pub mod error;
pub mod generator;
pub mod manager;
pub mod pool;
pub mod registry;
pub mod round;
pub mod shutdown;
