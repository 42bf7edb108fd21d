pub mod delimiter;
pub mod math;
pub mod normalize;
pub mod options;
pub mod segment;
pub mod syntax;
pub mod thinking;
pub mod types;

#[cfg(feature = "pulldown")]
pub mod adapters;

pub use delimiter::*;
pub use math::*;
pub use normalize::*;
pub use options::*;
pub use segment::*;
pub use thinking::*;
pub use types::*;
