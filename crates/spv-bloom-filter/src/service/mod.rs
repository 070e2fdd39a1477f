//! Service Layer
//!
//! Application services that orchestrate domain logic and reach external
//! dependencies through ports.

pub mod bloom_filter_service;

pub use bloom_filter_service::BloomFilterService;
