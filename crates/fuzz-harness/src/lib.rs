//! Traverse Fuzz Harness
//!
//! Shared proptest strategies for the traverse workspace: coordinates,
//! angles, thermal inputs and cleaned waypoint tracks.
//!
//! # Usage
//!
//! ```rust
//! use fuzz_harness::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_fuzz_test(lat in latitude_deg()) {
//!         prop_assert!((-90.0..=90.0).contains(&lat));
//!     }
//! }
//! ```

pub mod generators;

pub mod prelude {
    pub use crate::generators::*;
    pub use proptest::prelude::*;
}

// Re-export proptest for convenience
pub use proptest;
