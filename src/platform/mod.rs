//! Platform abstraction layer
//!
//! Host-side glue that is not part of the deterministic core:
//! - Per-host seed selection
//! - Browser bindings (`WebRunner`, wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebRunner;

/// A fresh, non-deterministic run seed
pub fn random_seed() -> u64 {
    rand::random()
}

/// Use the requested seed, or draw one when none was given
pub fn resolve_seed(requested: Option<u64>) -> u64 {
    let seed = requested.unwrap_or_else(random_seed);
    log::debug!("Using seed {}", seed);
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_seed_is_kept() {
        assert_eq!(resolve_seed(Some(42)), 42);
    }
}
