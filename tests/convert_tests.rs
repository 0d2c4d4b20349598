use std::fs;
use std::path::Path;

use csv2srs::generator::{encode, read_rule_set, OutputFormat};
use csv2srs::interfaces::{convert_dir, convert_reader, ConvertOptions};
use csv2srs::parser::{Diagnostics, MalformedRowPolicy, ParseOptions};
use csv2srs::ConvertError;

const EXAMPLE: &str = "rule_type,value
domain,example.com
domain_suffix,example.org
ip_cidr,10.0.0.0/8
";

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[cfg(test)]
mod convert_tests {
    use super::*;

    #[test]
    fn test_example_to_source_json() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "example.csv", EXAMPLE);

        let options = ConvertOptions {
            format: OutputFormat::Source,
            ..ConvertOptions::default()
        };
        let report = convert_dir(input.path(), output.path(), "csv", &options, false).unwrap();
        assert!(report.is_success());
        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.converted[0].values, 3);

        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(output.path().join("example.json")).unwrap())
                .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "version": 3,
                "rules": [{
                    "domain": ["example.com"],
                    "domain_suffix": ["example.org"],
                    "ip_cidr": ["10.0.0.0/8"]
                }]
            })
        );
    }

    #[test]
    fn test_bad_file_does_not_block_others() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "a_good.csv", EXAMPLE);
        write(
            input.path(),
            "b_bad.csv",
            "rule_type,value\ndomain,a.com\nunknown_type,value\n",
        );
        write(input.path(), "nested/c_good.csv", "rule_type,value\ndomain,c.com\n");

        let report = convert_dir(
            input.path(),
            output.path(),
            "csv",
            &ConvertOptions::default(),
            false,
        )
        .unwrap();

        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].path.ends_with("b_bad.csv"));
        assert!(matches!(
            report.failed[0].error,
            ConvertError::UnknownCategory { line: 3, .. }
        ));

        assert!(output.path().join("a_good.crs").is_file());
        assert!(output.path().join("c_good.crs").is_file());
        assert!(!output.path().join("b_bad.crs").exists());
        // no temporary files left behind
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_fail_fast_stops_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "a_bad.csv", "rule_type,value\ndomain,a.com,extra\n");
        write(input.path(), "b_good.csv", EXAMPLE);

        let report = convert_dir(
            input.path(),
            output.path(),
            "csv",
            &ConvertOptions::default(),
            true,
        )
        .unwrap();

        assert!(!report.is_success());
        assert!(report.converted.is_empty());
        assert!(matches!(
            report.failed[0].error,
            ConvertError::MalformedRow { line: 2, columns: 3 }
        ));
        assert!(!output.path().join("b_good.crs").exists());
    }

    #[test]
    fn test_skip_policy_converts_remaining_rows() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(
            input.path(),
            "rules.csv",
            "rule_type,value\ndomain,a.com,extra\ndomain,b.com\n",
        );

        let options = ConvertOptions {
            parse: ParseOptions {
                malformed_rows: MalformedRowPolicy::Skip,
                ..ParseOptions::default()
            },
            ..ConvertOptions::default()
        };
        let report = convert_dir(input.path(), output.path(), "csv", &options, false).unwrap();
        assert!(report.is_success());
        assert_eq!(report.converted[0].diagnostics.len(), 1);

        let (_, plain) =
            read_rule_set(fs::File::open(output.path().join("rules.crs")).unwrap()).unwrap();
        assert_eq!(plain.rules[0].items().domain, vec!["b.com"]);
    }

    #[test]
    fn test_header_only_file_converts() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "empty.csv", "rule_type,value\n");

        let report = convert_dir(
            input.path(),
            output.path(),
            "csv",
            &ConvertOptions::default(),
            false,
        )
        .unwrap();
        assert!(report.is_success());
        assert_eq!(report.converted[0].values, 0);

        let (_, plain) =
            read_rule_set(fs::File::open(output.path().join("empty.crs")).unwrap()).unwrap();
        assert_eq!(plain.rules.len(), 1);
        assert!(plain.rules[0].items().is_empty());
    }

    #[test]
    fn test_output_name_collision() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "a/geo.csv", "rule_type,value\ndomain,a.com\n");
        write(input.path(), "b/geo.csv", "rule_type,value\ndomain,b.com\n");

        let report = convert_dir(
            input.path(),
            output.path(),
            "csv",
            &ConvertOptions::default(),
            false,
        )
        .unwrap();
        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0].error,
            ConvertError::OutputCollision { .. }
        ));

        let (_, plain) =
            read_rule_set(fs::File::open(output.path().join("geo.crs")).unwrap()).unwrap();
        assert_eq!(plain.rules[0].items().domain, vec!["a.com"]);
    }

    #[test]
    fn test_output_never_overwrites_its_input() {
        let dir = tempfile::tempdir().unwrap();
        let source = "rule_type,value\ndomain,a.com\n";
        write(dir.path(), "rules.json", source);

        let options = ConvertOptions {
            format: OutputFormat::Source,
            ..ConvertOptions::default()
        };
        let report = convert_dir(dir.path(), dir.path(), "json", &options, false).unwrap();
        assert!(report.converted.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(matches!(
            report.failed[0].error,
            ConvertError::OutputIsInput { .. }
        ));
        assert!(!report.failed[0].error.to_string().contains("another input"));
        assert_eq!(
            fs::read_to_string(dir.path().join("rules.json")).unwrap(),
            source
        );
    }

    #[test]
    fn test_output_dir_is_created() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let target = output.path().join("compiled/rules");
        write(input.path(), "example.csv", EXAMPLE);

        let report = convert_dir(
            input.path(),
            &target,
            "csv",
            &ConvertOptions::default(),
            false,
        )
        .unwrap();
        assert!(report.is_success());
        assert!(target.join("example.crs").is_file());
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let options = ParseOptions::default();
        let first = convert_reader(EXAMPLE.as_bytes(), &options, &mut Diagnostics::new()).unwrap();
        let second =
            convert_reader(EXAMPLE.as_bytes(), &options, &mut Diagnostics::new()).unwrap();
        assert_eq!(first, second);

        for format in [OutputFormat::Binary, OutputFormat::Source] {
            assert_eq!(
                encode(&first, format, 3).unwrap(),
                encode(&second, format, 3).unwrap()
            );
        }
    }

    #[test]
    fn test_missing_input_dir_fails_batch() {
        let output = tempfile::tempdir().unwrap();
        let err = convert_dir(
            &output.path().join("missing"),
            output.path(),
            "csv",
            &ConvertOptions::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Walk(_)));
    }
}
