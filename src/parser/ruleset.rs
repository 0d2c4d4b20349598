use std::io::Read;

use crate::error::ConvertError;
use crate::models::RuleSet;
use crate::parser::builder::build_rule_set;
use crate::parser::classifier::RowClassifier;
use crate::parser::diagnostics::Diagnostics;
use crate::parser::types::ParseOptions;

/// Parse one tabular rule file into a rule set.
///
/// Skipped rows (only under [`MalformedRowPolicy::Skip`]) are reported
/// through `diagnostics`.
///
/// [`MalformedRowPolicy::Skip`]: crate::parser::MalformedRowPolicy::Skip
pub fn parse_rule_set<R: Read>(
    input: R,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Result<RuleSet, ConvertError> {
    build_rule_set(RowClassifier::new(input, options, diagnostics))
}
