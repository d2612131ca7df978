#![warn(clippy::all)]

//! Validator Map - a Mercator world map for validator geolocation.
//!
//! Projects a land boundary dataset onto a canvas, hides configured regions,
//! places validator pins with the same projection, and memoizes the outline
//! projection between frames.

pub mod config;
pub mod geo;
pub mod map;
