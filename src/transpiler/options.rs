//! Transpiler configuration

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the output is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Structural emission when the parser captured the whole program and
    /// there are no comments to lose, direct rewrite otherwise
    #[default]
    Auto,
    /// Always emit from the parsed program, rewriting what it carried verbatim
    Structural,
    /// Rewrite the source text without parsing
    Direct,
}

impl Strategy {
    /// Next strategy in the `auto → structural → direct` cycle
    pub fn next(self) -> Self {
        match self {
            Strategy::Auto => Strategy::Structural,
            Strategy::Structural => Strategy::Direct,
            Strategy::Direct => Strategy::Auto,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Auto => write!(f, "auto"),
            Strategy::Structural => write!(f, "structural"),
            Strategy::Direct => write!(f, "direct"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy `{0}` (expected auto, structural or direct)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Strategy::Auto),
            "structural" => Ok(Strategy::Structural),
            "direct" => Ok(Strategy::Direct),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub strategy: Strategy,
    /// Rule names left out of the standard pipeline
    pub disabled_rules: Vec<String>,
}

impl Options {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn disable_rule(mut self, name: impl Into<String>) -> Self {
        self.disabled_rules.push(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_cycle_returns_to_start() {
        let start = Strategy::default();
        assert_eq!(start, Strategy::Auto);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_strategy_names() {
        for strategy in [Strategy::Auto, Strategy::Structural, Strategy::Direct] {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("Direct".parse::<Strategy>(), Ok(Strategy::Direct));

        let err = "magic".parse::<Strategy>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown strategy `magic` (expected auto, structural or direct)"
        );
    }
}
