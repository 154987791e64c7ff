//! # Twine Comminution
//!
//! Crushing-circuit models and flowsheet evaluation for
//! [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: Jaw crusher, cone crusher and screen as [`twine_core::Model`]
//!   implementations.
//! - [`circuit`]: Flowsheets of those units, their evaluation, incremental
//!   re-evaluation, auto-design and tabular reports.
//! - [`equipment`]: A crusher catalog and the matcher that picks a machine
//!   for each evaluated stage.
//! - [`support`]: Size distributions, constrained numbers and unit helpers.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once more than one model or the circuit layer needs it.

pub mod circuit;
pub mod equipment;
pub mod models;
pub mod support;
