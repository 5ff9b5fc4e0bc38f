#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bucket_store;

/// A hash map implementation using open addressing with linear probing.
///
/// This module provides the `LinearMap` that orchestrates insertion,
/// removal, lookup, and growth atop the bucket store, with a configurable
/// hasher.
pub mod linear_map;

pub use bucket_store::BucketStore;
pub use bucket_store::Slot;
pub use linear_map::LinearMap;

/// The default hash builder, backed by `foldhash`.
///
/// Fast and high-quality, but not resistant to hash flooding. Inject a
/// keyed hasher (e.g. SipHash) via [`LinearMap::with_hasher`] if untrusted
/// keys are a concern.
#[cfg(feature = "foldhash")]
pub type DefaultHashBuilder = foldhash::fast::RandomState;
