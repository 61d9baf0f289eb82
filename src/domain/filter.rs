//! Filter - Numeric Range Bounds Entered by the User

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::metric::Metric;
use crate::error::Error;

/// A single numeric bound: either a value or no constraint at all
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Bound {
    #[default]
    Unconstrained,
    Value(f64),
}

impl Bound {
    /// Parse user-entered text. Total: text that is not a finite number
    /// (including empty text) is `Unconstrained`, never zero.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Bound::Value(v),
            _ => Bound::Unconstrained,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Bound::Unconstrained => None,
            Bound::Value(v) => Some(*v),
        }
    }

    pub fn is_constrained(&self) -> bool {
        matches!(self, Bound::Value(_))
    }
}

/// Which end of a range a bound limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoundSide {
    Min,
    Max,
}

impl BoundSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundSide::Min => "min",
            BoundSide::Max => "max",
        }
    }
}

/// Identifies one filter parameter, e.g. `pe_ratio_min`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterKey {
    pub metric: Metric,
    pub side: BoundSide,
}

impl FilterKey {
    pub const PE_RATIO_MIN: FilterKey = FilterKey::new(Metric::PeRatio, BoundSide::Min);
    pub const PE_RATIO_MAX: FilterKey = FilterKey::new(Metric::PeRatio, BoundSide::Max);
    pub const MARKET_CAP_MIN: FilterKey = FilterKey::new(Metric::MarketCap, BoundSide::Min);
    pub const MARKET_CAP_MAX: FilterKey = FilterKey::new(Metric::MarketCap, BoundSide::Max);

    pub const fn new(metric: Metric, side: BoundSide) -> Self {
        Self { metric, side }
    }

    /// Provider query parameter name
    pub fn param_name(&self) -> String {
        format!("{}_{}", self.metric.filter_stem(), self.side.as_str())
    }

    /// Every key the provider accepts
    pub fn all() -> impl Iterator<Item = FilterKey> {
        Metric::ALL.into_iter().flat_map(|metric| {
            [
                FilterKey::new(metric, BoundSide::Min),
                FilterKey::new(metric, BoundSide::Max),
            ]
        })
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.metric.filter_stem(), self.side.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FilterKey::all()
            .find(|key| key.param_name() == name)
            .ok_or_else(|| Error::Invalid {
                message: format!("Unknown filter: {name}"),
            })
    }
}

/// Raw text as typed plus its parsed bound
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterInput {
    pub text: String,
    pub bound: Bound,
}

impl FilterInput {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let bound = Bound::parse(&text);
        Self { text, bound }
    }
}

/// All filter inputs of the current intent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterBounds {
    inputs: BTreeMap<FilterKey, FilterInput>,
}

impl FilterBounds {
    /// Store the text for one bound; the bound is re-parsed every time
    pub fn set(&mut self, key: FilterKey, text: impl Into<String>) {
        self.inputs.insert(key, FilterInput::new(text));
    }

    /// Parsed bound for a key, `Unconstrained` if never set
    pub fn bound(&self, key: FilterKey) -> Bound {
        self.inputs
            .get(&key)
            .map(|input| input.bound)
            .unwrap_or_default()
    }

    /// Raw text for a key, empty if never set
    pub fn text(&self, key: FilterKey) -> &str {
        self.inputs
            .get(&key)
            .map(|input| input.text.as_str())
            .unwrap_or("")
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
    }

    /// Whether any bound constrains the result
    pub fn is_constrained(&self) -> bool {
        self.inputs.values().any(|input| input.bound.is_constrained())
    }

    /// Constrained bounds as provider query parameters, in key order
    pub fn params(&self) -> Vec<(String, f64)> {
        self.inputs
            .iter()
            .filter_map(|(key, input)| input.bound.value().map(|v| (key.param_name(), v)))
            .collect()
    }
}
