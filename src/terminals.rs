// Heuristics over the free-text "Bornes" column: how many charge points a
// line describes, and which power category they fall in.
//
// Both are ordered rule lists; the first matching rule decides.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::normalize;

static MULTIPLIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*[x×]").expect("multiplier pattern"));
static ANY_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("digits pattern"));
static COUNT_TIMES_POWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)\s*[x×]\s*([0-9]+(?:[.,][0-9]+)?)").expect("count x power pattern")
});
static POWER_KW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+(?:[.,][0-9]+)?)\s*kw").expect("power pattern"));

pub const TYPE_NOT_FILLED: &str = "Non renseigné";
pub const TYPE_UNSPECIFIED: &str = "Autre / Non spécifié";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityRule {
    /// Sum of every `<n>x` / `<n> ×` group, saturating at `u32::MAX`.
    Multipliers,
    Double,
    Simple,
    /// A power rating or some number without a multiplier: one terminal.
    PowerOrNumber,
    /// Unrecognised but non-empty text: one terminal.
    AnyText,
    Blank,
}

impl QuantityRule {
    pub const ORDER: [QuantityRule; 6] = [
        QuantityRule::Blank,
        QuantityRule::Multipliers,
        QuantityRule::Double,
        QuantityRule::Simple,
        QuantityRule::PowerOrNumber,
        QuantityRule::AnyText,
    ];

    /// The quantity this rule yields for `normalized`, if it applies.
    fn apply(self, normalized: &str) -> Option<u32> {
        match self {
            QuantityRule::Blank => normalized.is_empty().then_some(0),
            QuantityRule::Multipliers => {
                let counts: Vec<u32> = MULTIPLIER
                    .captures_iter(normalized)
                    .map(|c| c[1].parse::<u32>().unwrap_or(u32::MAX))
                    .collect();
                (!counts.is_empty())
                    .then(|| counts.iter().fold(0u32, |acc, n| acc.saturating_add(*n)))
            }
            QuantityRule::Double => normalized.contains("double").then_some(2),
            QuantityRule::Simple => normalized.contains("simple").then_some(1),
            QuantityRule::PowerOrNumber => {
                (normalized.contains("kw") || ANY_DIGITS.is_match(normalized)).then_some(1)
            }
            QuantityRule::AnyText => Some(1),
        }
    }
}

/// Number of terminals a description stands for, with the rule that decided.
pub fn quantity_with_rule(raw: &str) -> (u32, QuantityRule) {
    let normalized = normalize(raw);
    QuantityRule::ORDER
        .into_iter()
        .find_map(|rule| rule.apply(&normalized).map(|n| (n, rule)))
        .unwrap_or((1, QuantityRule::AnyText))
}

pub fn quantity(raw: &str) -> u32 {
    quantity_with_rule(raw).0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    Blank,
    CountTimesPower,
    PowerKw,
    Double,
    Simple,
    Unspecified,
}

impl TypeRule {
    pub const ORDER: [TypeRule; 6] = [
        TypeRule::Blank,
        TypeRule::CountTimesPower,
        TypeRule::PowerKw,
        TypeRule::Double,
        TypeRule::Simple,
        TypeRule::Unspecified,
    ];

    fn apply(self, normalized: &str) -> Option<String> {
        match self {
            TypeRule::Blank => normalized.is_empty().then(|| TYPE_NOT_FILLED.to_string()),
            TypeRule::CountTimesPower => COUNT_TIMES_POWER
                .captures(normalized)
                .map(|c| format!("{}x{}kW", &c[1], decimal_point(&c[2]))),
            TypeRule::PowerKw => POWER_KW
                .captures(normalized)
                .map(|c| format!("{} kW", decimal_point(&c[1]))),
            TypeRule::Double => normalized.contains("double").then(|| "Double".to_string()),
            TypeRule::Simple => normalized.contains("simple").then(|| "Simple".to_string()),
            TypeRule::Unspecified => Some(TYPE_UNSPECIFIED.to_string()),
        }
    }
}

fn decimal_point(s: &str) -> String {
    s.replace(',', ".")
}

pub fn type_with_rule(raw: &str) -> (String, TypeRule) {
    let normalized = normalize(raw);
    TypeRule::ORDER
        .into_iter()
        .find_map(|rule| rule.apply(&normalized).map(|label| (label, rule)))
        .unwrap_or_else(|| (TYPE_UNSPECIFIED.to_string(), TypeRule::Unspecified))
}

/// Canonical type label such as "2x22kW", "7.4 kW" or "Double".
pub fn type_label(raw: &str) -> String {
    type_with_rule(raw).0
}
