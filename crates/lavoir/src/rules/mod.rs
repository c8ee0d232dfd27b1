//! Declarative cleaning rules and the engine that applies them.

mod engine;
mod rule;

pub use engine::RuleEngine;
pub use rule::{predefined_rules, CleaningRule, RuleDefinition, RuleKind, RuleOrigin};
