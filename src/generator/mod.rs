pub mod offer;
pub mod random;
pub mod source;
pub mod traits;
pub mod types;

pub use offer::TsvOfferGenerator;
pub use source::source_for;
pub use traits::OfferGenerator;
pub use types::GeneratorConfig;
