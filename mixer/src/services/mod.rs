//! Service implementations
//!
//! Real implementations of the service traits for production use

pub mod media_library;

#[cfg(test)]
mod tests;

pub use media_library::RealMediaLibrary;
