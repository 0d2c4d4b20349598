use crate::error::ConvertError;
use crate::models::{RuleCategory, RuleSet};
use crate::parser::types::ClassifiedRow;

/// Folds classified rows into a [`RuleSet`].
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rule_set: RuleSet,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the row's value to its category.
    ///
    /// An unknown category token fails the file; it is never dropped.
    pub fn push(&mut self, row: ClassifiedRow) -> Result<(), ConvertError> {
        match RuleCategory::from_token(&row.category) {
            Some(category) => {
                self.rule_set.push(category, row.value);
                Ok(())
            }
            None => Err(ConvertError::UnknownCategory {
                line: row.line,
                token: row.category,
            }),
        }
    }

    pub fn build(self) -> RuleSet {
        self.rule_set
    }
}

/// Consume `rows` in order and return the finished rule set, or the first error.
pub fn build_rule_set<I>(rows: I) -> Result<RuleSet, ConvertError>
where
    I: IntoIterator<Item = Result<ClassifiedRow, ConvertError>>,
{
    let mut builder = RuleSetBuilder::new();
    for row in rows {
        builder.push(row?)?;
    }
    Ok(builder.build())
}
