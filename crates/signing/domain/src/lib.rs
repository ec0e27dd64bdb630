//! Domain types for the loan contract signing workflow.
//!
//! This crate provides the core domain models for tracking which parties must sign a loan
//! contract, the state of each individual signature, and the derived workflow state of the
//! contract as a whole. Everything here is pure: records come in, decisions come out, and all
//! I/O lives in the store and engine crates.

#![no_std]

extern crate alloc;

pub mod contract;
pub mod signature;
pub mod workflow;

#[cfg(test)]
mod tests;

use bon::Builder;
use chrono::{DateTime, Utc};
use dissolve_derive::Dissolve;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamp metadata for tracking entity creation and modification times.
///
/// This struct is commonly used as auxiliary data (`AUX`) in other domain types
/// to track when entities were created and last updated.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Dissolve)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamps {
    /// The timestamp when the entity was created.
    created_at: DateTime<Utc>,
    /// The timestamp when the entity was last updated.
    updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Creates timestamps for an entity that has not been modified since creation.
    pub fn unmodified_since(created_at: DateTime<Utc>) -> Self {
        Self { created_at, updated_at: created_at }
    }
}
