//! This module provides common objects used throughout the entire application

pub mod error;
pub mod object_key;
