//! Comminution unit operations.
//!
//! - [`crusher`]: Jaw and cone crushers under Bond's energy law with a
//!   Gaudin–Schuhmann product curve.
//! - [`screen`]: An ideal sharp-cutoff screen.
//!
//! Both models consume and produce [`Stream`]s: a size distribution paired
//! with the mass rate carrying it.

pub mod crusher;
pub mod screen;
mod stream;

pub use stream::Stream;
