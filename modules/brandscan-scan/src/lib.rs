pub mod extract;
pub mod probes;
pub mod scanner;
pub mod signatures;

pub use scanner::{normalize_target, SiteScanner};
pub use signatures::Signature;
