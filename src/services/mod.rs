//! Built-in services.
//!
//! Each service keeps its URL shapes, endpoints and field mapping in its own
//! module and plugs into the core through the capability traits.

pub mod media_ccc;
pub mod youtube;
