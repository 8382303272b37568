//! HTTP surface of the mixing service

pub mod handlers;
