use std::fmt;

use serde::{Deserialize, Serialize};

/// First rule-set format version.
pub const RULE_SET_VERSION_1: u8 = 1;
/// Rule-set format version 2.
pub const RULE_SET_VERSION_2: u8 = 2;
/// Rule-set format version 3.
pub const RULE_SET_VERSION_3: u8 = 3;
/// Version written when none is requested.
pub const RULE_SET_VERSION_CURRENT: u8 = RULE_SET_VERSION_3;

/// Returns true if `version` is a rule-set format version the encoders can write.
pub fn is_supported_version(version: u8) -> bool {
    (RULE_SET_VERSION_1..=RULE_SET_VERSION_CURRENT).contains(&version)
}

/// Kind of matcher a row contributes to.
///
/// The set is closed: the downstream rule-set format only knows these
/// categories, so there is no way to register new ones at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Domain,
    DomainSuffix,
    PackageName,
    ProcessName,
    IpCidr,
}

impl RuleCategory {
    /// All categories in canonical (encoding) order.
    pub const ALL: [RuleCategory; 5] = [
        RuleCategory::Domain,
        RuleCategory::DomainSuffix,
        RuleCategory::PackageName,
        RuleCategory::ProcessName,
        RuleCategory::IpCidr,
    ];

    /// Resolve a category token exactly as written in the input.
    ///
    /// Matching is case-sensitive and has no aliases, so `Domain` and
    /// `domain-suffix` are both unknown.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "domain" => Some(RuleCategory::Domain),
            "domain_suffix" => Some(RuleCategory::DomainSuffix),
            "package_name" => Some(RuleCategory::PackageName),
            "process_name" => Some(RuleCategory::ProcessName),
            "ip_cidr" => Some(RuleCategory::IpCidr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Domain => "domain",
            RuleCategory::DomainSuffix => "domain_suffix",
            RuleCategory::PackageName => "package_name",
            RuleCategory::ProcessName => "process_name",
            RuleCategory::IpCidr => "ip_cidr",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values collected from one input file, one ordered list per category.
///
/// Values keep input order and duplicates; nothing is trimmed or validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain_suffix: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub process_name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_cidr: Vec<String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the list of `category`.
    pub fn push(&mut self, category: RuleCategory, value: String) {
        self.values_mut(category).push(value);
    }

    pub fn values(&self, category: RuleCategory) -> &[String] {
        match category {
            RuleCategory::Domain => &self.domain,
            RuleCategory::DomainSuffix => &self.domain_suffix,
            RuleCategory::PackageName => &self.package_name,
            RuleCategory::ProcessName => &self.process_name,
            RuleCategory::IpCidr => &self.ip_cidr,
        }
    }

    fn values_mut(&mut self, category: RuleCategory) -> &mut Vec<String> {
        match category {
            RuleCategory::Domain => &mut self.domain,
            RuleCategory::DomainSuffix => &mut self.domain_suffix,
            RuleCategory::PackageName => &mut self.package_name,
            RuleCategory::ProcessName => &mut self.process_name,
            RuleCategory::IpCidr => &mut self.ip_cidr,
        }
    }

    /// Categories that hold at least one value, in canonical order.
    pub fn categories(&self) -> impl Iterator<Item = RuleCategory> + '_ {
        RuleCategory::ALL
            .into_iter()
            .filter(move |category| !self.values(*category).is_empty())
    }

    /// Total number of values across all categories.
    pub fn len(&self) -> usize {
        RuleCategory::ALL
            .iter()
            .map(|category| self.values(*category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A rule whose conditions are OR-ed together by the matching engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultHeadlessRule {
    #[serde(flatten)]
    pub items: RuleSet,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub invert: bool,
}

/// A rule inside a rule-set file.
///
/// Only the default (flat) rule kind is produced; logical rules are not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeadlessRule {
    Default(DefaultHeadlessRule),
}

impl HeadlessRule {
    pub fn items(&self) -> &RuleSet {
        match self {
            HeadlessRule::Default(rule) => &rule.items,
        }
    }
}

/// The structure handed to an encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainRuleSet {
    pub rules: Vec<HeadlessRule>,
}

impl From<RuleSet> for PlainRuleSet {
    /// Every category collapses into a single rule, never one rule per
    /// category or per row.
    fn from(items: RuleSet) -> Self {
        PlainRuleSet {
            rules: vec![HeadlessRule::Default(DefaultHeadlessRule {
                items,
                invert: false,
            })],
        }
    }
}
