pub mod handles;
pub mod prober;
pub mod registry;
pub mod trustpilot;

pub use handles::generate_handles;
pub use prober::{default_platforms, PlatformSpec, PresenceProber, VariantSet};
