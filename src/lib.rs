#![doc(test(attr(deny(warnings))))]

//! Cost Simulator offers the pricing catalog, price resolution, and the
//! multi-step estimation wizard that power the construction cost calculator
//! and its terminal front end.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod contact;
pub mod currency;
pub mod errors;
pub mod pricing;
pub mod storage;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cost Simulator tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
