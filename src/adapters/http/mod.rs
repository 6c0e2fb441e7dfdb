//! HTTP adapters - REST API implementations.
//!
//! - `provider` - JSON endpoints for every payment provider operation

pub mod provider;

// Re-export key types for convenience
pub use provider::provider_router;
pub use provider::ProviderAppState;
