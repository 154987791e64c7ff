//! Public Twine models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Organization
//!
//! Models are organized into domain-specific submodules. Everything in this
//! crate currently lives under [`comminution`], the size-reduction and
//! classification units of a crushing plant.
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the actual computation and domain logic lives. The `core` module is an
//! implementation detail and is **not** re-exported as part of the public API.
//!
//! The [`twine_core::Model`] implementation is a thin adapter that delegates to
//! the model-specific core API. The circuit evaluator in [`crate::circuit`]
//! runs each unit through that adapter.

pub mod comminution;
