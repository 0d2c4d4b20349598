use std::io::Read;

use csv::{ByteRecord, ReaderBuilder, StringRecord};

use crate::error::ConvertError;
use crate::parser::diagnostics::{Diagnostic, Diagnostics};
use crate::parser::types::{ClassifiedRow, MalformedRowPolicy, ParseOptions};

/// Splits one tabular input into classified rows.
///
/// The first record is the header and is always discarded, whatever it
/// contains. It is read as raw bytes, so it need not be valid UTF-8. Blank lines are skipped by the CSV reader. Fields are taken
/// verbatim: no trimming and no case folding. The iterator is single pass
/// and stops for good after yielding an error.
pub struct RowClassifier<'d, R> {
    reader: csv::Reader<R>,
    record: StringRecord,
    policy: MalformedRowPolicy,
    diagnostics: &'d mut Diagnostics,
    header_skipped: bool,
    finished: bool,
}

impl<'d, R: Read> RowClassifier<'d, R> {
    pub fn new(input: R, options: &ParseOptions, diagnostics: &'d mut Diagnostics) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .from_reader(input);

        RowClassifier {
            reader,
            record: StringRecord::new(),
            policy: options.malformed_rows,
            diagnostics,
            header_skipped: false,
            finished: false,
        }
    }

    fn current_line(&self) -> u64 {
        self.record.position().map(|pos| pos.line()).unwrap_or(0)
    }

    fn fail(&mut self, err: ConvertError) -> Option<Result<ClassifiedRow, ConvertError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<R: Read> Iterator for RowClassifier<'_, R> {
    type Item = Result<ClassifiedRow, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.header_skipped {
            self.header_skipped = true;
            match self.reader.read_byte_record(&mut ByteRecord::new()) {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => return self.fail(e.into()),
            }
        }

        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => return self.fail(e.into()),
            }

            let line = self.current_line();
            if self.record.len() == 2 {
                return Some(Ok(ClassifiedRow {
                    line,
                    category: self.record[0].to_string(),
                    value: self.record[1].to_string(),
                }));
            }

            let columns = self.record.len();
            match self.policy {
                MalformedRowPolicy::Reject => {
                    return self.fail(ConvertError::MalformedRow { line, columns });
                }
                MalformedRowPolicy::Skip => {
                    self.diagnostics.push(Diagnostic::malformed_row(line, columns));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(
        input: &str,
        policy: MalformedRowPolicy,
    ) -> (Vec<Result<ClassifiedRow, ConvertError>>, Diagnostics) {
        let options = ParseOptions {
            malformed_rows: policy,
            ..ParseOptions::default()
        };
        let mut diagnostics = Diagnostics::new();
        let rows = RowClassifier::new(input.as_bytes(), &options, &mut diagnostics).collect();
        (rows, diagnostics)
    }

    fn values(rows: Vec<Result<ClassifiedRow, ConvertError>>) -> Vec<(String, String)> {
        rows.into_iter()
            .map(|row| {
                let row = row.unwrap();
                (row.category, row.value)
            })
            .collect()
    }

    #[test]
    fn test_header_is_discarded_even_when_well_formed() {
        let (rows, _) = classify("domain,header.com\ndomain,a.com\n", MalformedRowPolicy::Reject);
        assert_eq!(
            values(rows),
            vec![("domain".to_string(), "a.com".to_string())]
        );
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let (rows, diagnostics) = classify("rule_type,value\n", MalformedRowPolicy::Reject);
        assert!(rows.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_header_shape_is_not_checked() {
        let (rows, _) = classify("a,b,c,d\nip_cidr,10.0.0.0/8\n", MalformedRowPolicy::Reject);
        assert_eq!(values(rows).len(), 1);
    }

    #[test]
    fn test_values_are_verbatim() {
        let (rows, _) = classify(
            "rule_type,value\nDomain, Example.COM \n",
            MalformedRowPolicy::Reject,
        );
        assert_eq!(
            values(rows),
            vec![("Domain".to_string(), " Example.COM ".to_string())]
        );
    }

    #[test]
    fn test_quoted_value_may_contain_separator() {
        let (rows, _) = classify(
            "rule_type,value\nprocess_name,\"a,b.exe\"\n",
            MalformedRowPolicy::Reject,
        );
        assert_eq!(
            values(rows),
            vec![("process_name".to_string(), "a,b.exe".to_string())]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped_silently() {
        let (rows, diagnostics) = classify(
            "rule_type,value\n\ndomain,a.com\r\n\r\ndomain,b.com\n\n",
            MalformedRowPolicy::Reject,
        );
        assert_eq!(values(rows).len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_line_numbers() {
        let (rows, _) = classify(
            "rule_type,value\ndomain,a.com\ndomain,b.com\n",
            MalformedRowPolicy::Reject,
        );
        let lines: Vec<u64> = rows.into_iter().map(|row| row.unwrap().line).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_reject_policy_stops_at_malformed_row() {
        let (rows, diagnostics) = classify(
            "rule_type,value\ndomain,a.com\ndomain,a.com,extra\ndomain,b.com\n",
            MalformedRowPolicy::Reject,
        );
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_ok());
        match &rows[1] {
            Err(ConvertError::MalformedRow { line, columns }) => {
                assert_eq!(*line, 3);
                assert_eq!(*columns, 3);
            }
            other => panic!("expected malformed row error, got {:?}", other),
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_skip_policy_records_diagnostics() {
        let (rows, diagnostics) = classify(
            "rule_type,value\ndomain,a.com,extra\njust_one\ndomain,b.com\n",
            MalformedRowPolicy::Skip,
        );
        assert_eq!(
            values(rows),
            vec![("domain".to_string(), "b.com".to_string())]
        );
        let found: Vec<Diagnostic> = diagnostics.into_iter().collect();
        assert_eq!(
            found,
            vec![Diagnostic::malformed_row(2, 3), Diagnostic::malformed_row(3, 1)]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let options = ParseOptions {
            delimiter: b';',
            ..ParseOptions::default()
        };
        let mut diagnostics = Diagnostics::new();
        let rows: Vec<_> = RowClassifier::new(
            "rule_type;value\ndomain_suffix;example.org\n".as_bytes(),
            &options,
            &mut diagnostics,
        )
        .collect();
        assert_eq!(
            values(rows),
            vec![("domain_suffix".to_string(), "example.org".to_string())]
        );
    }

    #[test]
    fn test_header_need_not_be_utf8() {
        let options = ParseOptions::default();
        let mut diagnostics = Diagnostics::new();
        let input: &[u8] = b"rule_type,val\xe9ur\ndomain,a.com\n";
        let rows: Vec<_> = RowClassifier::new(input, &options, &mut diagnostics).collect();
        assert_eq!(
            values(rows),
            vec![("domain".to_string(), "a.com".to_string())]
        );
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let options = ParseOptions::default();
        let mut diagnostics = Diagnostics::new();
        let input: &[u8] = b"rule_type,value\ndomain,\xff\xfe\n";
        let rows: Vec<_> = RowClassifier::new(input, &options, &mut diagnostics).collect();
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], Err(ConvertError::Csv(_))));
    }
}
