use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::error::ConvertError;
use crate::generator::OutputFormat;
use crate::models::{PlainRuleSet, RULE_SET_VERSION_CURRENT};
use crate::parser::{parse_rule_set, Diagnostics, ParseOptions};
use crate::utils::{discover_inputs, output_path_for, write_atomically};

/// Options shared by every file of a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// How input rows are read
    pub parse: ParseOptions,
    /// Output artifact format
    pub format: OutputFormat,
    /// Rule-set format version to write
    pub version: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            parse: ParseOptions::default(),
            format: OutputFormat::default(),
            version: RULE_SET_VERSION_CURRENT,
        }
    }
}

/// Result of converting one file
#[derive(Debug)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Number of values written across all categories
    pub values: usize,
    /// Rows skipped while reading the input
    pub diagnostics: Diagnostics,
}

/// A file that could not be converted
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: ConvertError,
}

/// Outcome of a directory conversion
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<FileReport>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Read one tabular input into the single-rule structure handed to encoders.
pub fn convert_reader<R: Read>(
    input: R,
    options: &ParseOptions,
    diagnostics: &mut Diagnostics,
) -> Result<PlainRuleSet, ConvertError> {
    let rule_set = parse_rule_set(input, options, diagnostics)?;
    Ok(PlainRuleSet::from(rule_set))
}

/// Convert `input` into the artifact at `output`.
///
/// The input is parsed completely before anything is written, and the
/// artifact is written through a temporary file, so a failed conversion
/// never leaves a partial output behind.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<FileReport, ConvertError> {
    let file = File::open(input).map_err(|e| ConvertError::io(input, e))?;
    let mut diagnostics = Diagnostics::new();
    let rule_set = convert_reader(file, &options.parse, &mut diagnostics)?;
    let values = rule_set
        .rules
        .iter()
        .map(|rule| rule.items().len())
        .sum();

    let writer = options.format.writer();
    write_atomically(output, |out| {
        writer
            .write(out, &rule_set, options.version)
            .map_err(ConvertError::from)
    })?;

    Ok(FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        values,
        diagnostics,
    })
}

/// Convert every `*.<extension>` file below `input_dir` into `output_dir`.
///
/// Each file is converted on its own: a failure is recorded in the report
/// and the remaining files are still processed unless `fail_fast` is set.
/// Only a failure to list the inputs or create the output directory
/// aborts the batch.
pub fn convert_dir(
    input_dir: &Path,
    output_dir: &Path,
    extension: &str,
    options: &ConvertOptions,
    fail_fast: bool,
) -> Result<BatchReport, ConvertError> {
    let inputs = discover_inputs(input_dir, extension)?;
    info!(
        "Found {} rule file(s) in '{}'",
        inputs.len(),
        input_dir.display()
    );

    fs::create_dir_all(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;

    let output_extension = options.format.extension();
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut report = BatchReport::default();

    for input in inputs {
        let output = output_path_for(&input, output_dir, output_extension);
        debug!("Converting '{}' to '{}'", input.display(), output.display());

        let result = match claimed.get(&output) {
            Some(previous) => {
                warn!(
                    "'{}' and '{}' both map to '{}'",
                    previous.display(),
                    input.display(),
                    output.display()
                );
                Err(ConvertError::OutputCollision {
                    path: output.clone(),
                })
            }
            None if output == input => Err(ConvertError::OutputIsInput {
                path: output.clone(),
            }),
            None => {
                claimed.insert(output.clone(), input.clone());
                convert_file(&input, &output, options)
            }
        };

        match result {
            Ok(file) => {
                for diagnostic in &file.diagnostics {
                    warn!("'{}': {}", input.display(), diagnostic);
                }
                info!(
                    "Converted '{}' to '{}' ({} values)",
                    file.input.display(),
                    file.output.display(),
                    file.values
                );
                report.converted.push(file);
            }
            Err(error) => {
                error!("Failed to convert '{}': {}", input.display(), error);
                report.failed.push(FailedFile { path: input, error });
                if fail_fast {
                    break;
                }
            }
        }
    }

    Ok(report)
}
