//! Authenticated session layer for the Lost & Found client.
//!
//! A [`session::SessionStore`] owns the token pair, [`net::HttpClient`]
//! injects the bearer and recovers a single 401 through the refresh endpoint,
//! and [`guard`] decides whether a protected route may render.

pub mod config;
pub mod error;
pub mod guard;
pub mod net;
pub mod session;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test_support;
