//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;
pub mod stub_transport;
