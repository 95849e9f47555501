// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cast hygiene
#![deny(trivial_casts)]

//! Pointer-reactive tilt, glow and scale engine for on-screen panels.
//!
//! As a pointer moves, nearby panels ("entities") tilt, glow, or scale in
//! proportion to pointer proximity and relative position, then relax back
//! to rest once the pointer departs. Rendering is left to the host: the
//! engine only writes named visual parameters into a [`scene::StyleSink`].
//!
//! # Key entry points
//!
//! - [`engine::Engine`] - owns the entity registry, the broadcaster and
//!   the relaxation runs
//! - [`transform`] - the pure transform model and proximity calculator
//! - [`options::Options`] - per-family configuration with TOML presets
//! - [`scene::MemoryScene`] - headless host used by tests and the
//!   simulation binary
//!
//! # Architecture
//!
//! Everything runs on one thread, driven by host callbacks: pointer samples
//! go to [`engine::Engine::pointer_moved`], element-local events to
//! [`engine::Engine::handle_local`], frame callbacks to
//! [`engine::Engine::on_frame`] and scene mutations to
//! [`engine::Engine::scene_changed`]. The host abstracts its frame loop as
//! `schedule`/`cancel` through [`animation::FrameScheduler`].

pub mod animation;
pub mod engine;
pub mod entity;
pub mod error;
pub mod input;
pub mod options;
pub mod scene;
pub mod transform;
pub mod util;
#[cfg(feature = "web")]
pub mod web;

pub use engine::Engine;
pub use error::EffectError;
pub use options::Options;
pub use transform::VisualParameters;
