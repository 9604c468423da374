//! This module provides the dump pipeline: storage access, listing, fetching,
//! decoding and emitting objects

pub mod driver;
pub mod emitter;
pub mod object_backend;
pub mod object_fetcher;
pub mod object_lister;
