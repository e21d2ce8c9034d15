//! Platform hosts
//!
//! A host owns the frame loop: it measures the delta, forwards lane intents,
//! calls `sim::tick` once per frame, and fulfils narrative requests off the
//! simulation path. `host` holds the shared loop; the native host is the
//! `heart-dash` binary.

pub mod host;

#[cfg(target_arch = "wasm32")]
pub mod web;
