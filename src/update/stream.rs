//! Decoder for the concatenated JSON objects printed by `go list -json`
//!
//! The output is not a JSON array: it is a sequence of independent objects.
//! Records are pulled one at a time; the sequence is finite and cannot be
//! restarted.

use crate::domain::DependencyRecord;
use crate::error::ReportError;

/// Lazily decode dependency records from a buffered JSON stream
pub fn decode_records(
    bytes: &[u8],
) -> impl Iterator<Item = Result<DependencyRecord, ReportError>> + '_ {
    serde_json::Deserializer::from_slice(bytes)
        .into_iter::<DependencyRecord>()
        .map(|item| item.map_err(|source| ReportError::Decode { source }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_concatenated_objects() {
        let input = br#"{"Path":"example.com/foo","Main":true}
{"Path":"example.com/bar","Version":"v1.0.0","Update":{"Path":"example.com/bar","Version":"v1.2.0"}}
{"Path":"example.com/baz","Version":"v0.3.0"}
"#;
        let records: Vec<_> = decode_records(input).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].main);
        assert_eq!(records[1].new_version(), Some("v1.2.0"));
        assert!(records[2].update.is_none());
    }

    #[test]
    fn test_decode_pretty_printed_objects() {
        let input = br#"{
	"Path": "example.com/a",
	"Version": "v1.0.0"
}
{
	"Path": "example.com/b",
	"Version": "v2.0.0"
}"#;
        let records: Vec<_> = decode_records(input).collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].import_path, "example.com/b");
    }

    #[test]
    fn test_decode_without_separators() {
        let input = br#"{"Path":"a","Version":"v1"}{"Path":"b","Version":"v2"}"#;
        assert_eq!(decode_records(input).count(), 2);
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(decode_records(b"").count(), 0);
        assert_eq!(decode_records(b"  \n\t").count(), 0);
    }

    #[test]
    fn test_decode_is_lazy() {
        let input = br#"{"Path":"a","Version":"v1"} {"Path": oops}"#;
        let mut records = decode_records(input);
        assert!(records.next().unwrap().is_ok());
        assert!(matches!(
            records.next().unwrap(),
            Err(ReportError::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_array() {
        let input = br#"[{"Path":"a","Version":"v1"}]"#;
        let result: Result<Vec<_>, _> = decode_records(input).collect();
        assert!(result.is_err());
    }
}
