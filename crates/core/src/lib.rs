//! Domain logic for the wizard meme adapter.
//!
//! Locates the Porchroot Auto checkout, loads its generator scripts across a
//! subprocess plugin boundary, and drives generation runs. Nothing here knows
//! about HTTP.

pub mod clamp;
pub mod error;
pub mod generation;
pub mod locator;
pub mod scripting;
