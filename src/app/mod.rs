// Application layer: use cases and the ports they depend on

pub mod explore_use_case;
pub mod normalize_use_case;
pub mod ports;

pub use explore_use_case::ExploreUseCase;
pub use normalize_use_case::{NormalizeUseCase, RunReport};
