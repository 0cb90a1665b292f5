pub mod charset;
pub mod engine;
pub mod forward;
pub mod inverse;
pub mod normalize;
pub(crate) mod pool;
pub mod rule;
pub mod settings;
pub mod table;

pub use engine::{BestPath, TypingEngine};
pub use rule::{ConversionRule, RuleElement, RuleError};
pub use table::Flavor;

#[cfg(test)]
mod proptest_paths;
