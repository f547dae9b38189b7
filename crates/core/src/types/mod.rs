//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::{Price, to_persian_digits};
pub use product::{Product, ProductType};
