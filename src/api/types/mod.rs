/// Account tree structures
pub mod account;

/// Entitlement structures
pub mod entitlement;

/// Session structures
pub mod session;

/// Service key structures
pub mod service_key;
