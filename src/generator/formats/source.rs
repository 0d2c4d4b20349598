use std::io::Write;

use serde::Serialize;

use crate::generator::{check_version, EncodeError, RuleSetWriter};
use crate::models::{HeadlessRule, PlainRuleSet};

/// Writes the JSON "source" form of a rule set:
///
/// ```json
/// {
///   "version": 3,
///   "rules": [
///     { "domain": ["example.com"], "ip_cidr": ["10.0.0.0/8"] }
///   ]
/// }
/// ```
///
/// Empty categories are left out of the rule object.
pub struct SourceWriter;

#[derive(Serialize)]
struct SourceRuleSet<'a> {
    version: u8,
    rules: &'a [HeadlessRule],
}

impl RuleSetWriter for SourceWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(
        &self,
        writer: &mut dyn Write,
        rule_set: &PlainRuleSet,
        version: u8,
    ) -> Result<(), EncodeError> {
        check_version(version)?;
        let source = SourceRuleSet {
            version,
            rules: &rule_set.rules,
        };
        serde_json::to_writer_pretty(&mut *writer, &source)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
