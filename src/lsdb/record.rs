use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("token '{0}' has no '=' separator")]
    MissingSeparator(String),
    #[error("missing required key {0}")]
    MissingKey(&'static str),
    #[error("wrong value type for key {0}")]
    WrongType(&'static str),
}

/// A parsed field value. The split between integer and text is decided once,
/// here, so downstream code reads through typed accessors instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(u64),
    Text(String),
}

/// One decoded lsadump line as a field mapping.
///
/// Expected example lines:
/// - `LSATYPE=1 LSAID=10.0.0.1 ADVROUTER=10.0.0.1 LINKTYPE=1 LINKID=10.0.0.2 DATA=192.168.1.1`
/// - `LSATYPE=2 LSAID=192.168.0.3 ADVROUTER=10.0.0.3 ATTACHED=10.0.0.1`
#[derive(Debug, Clone)]
pub struct DumpRecord {
    fields: HashMap<String, FieldValue>,
}

impl DumpRecord {
    /// Parse a single dump line. The line is trimmed, split on single spaces,
    /// and every token must carry a `KEY=VALUE` pair (split on the first `=`).
    /// Values made of decimal digits only become `FieldValue::Int`.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut fields = HashMap::new();
        for token in line.trim().split(' ') {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| RecordError::MissingSeparator(token.to_string()))?;
            let value = if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                match value.parse::<u64>() {
                    Ok(n) => FieldValue::Int(n),
                    Err(_) => FieldValue::Text(value.to_string()),
                }
            } else {
                FieldValue::Text(value.to_string())
            };
            fields.insert(key.to_string(), value);
        }
        Ok(Self { fields })
    }

    #[allow(dead_code)]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn require_int(&self, key: &'static str) -> Result<u64, RecordError> {
        match self.fields.get(key) {
            Some(FieldValue::Int(n)) => Ok(*n),
            Some(FieldValue::Text(_)) => Err(RecordError::WrongType(key)),
            None => Err(RecordError::MissingKey(key)),
        }
    }

    pub fn require_text(&self, key: &'static str) -> Result<&str, RecordError> {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) => Ok(s),
            Some(FieldValue::Int(_)) => Err(RecordError::WrongType(key)),
            None => Err(RecordError::MissingKey(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_values() {
        let record =
            DumpRecord::parse("LSATYPE=1 LSAID=10.0.0.1 ADVROUTER=10.0.0.1 LINKTYPE=2").unwrap();

        assert_eq!(record.require_int("LSATYPE").unwrap(), 1);
        assert_eq!(record.require_int("LINKTYPE").unwrap(), 2);
        assert_eq!(record.require_text("LSAID").unwrap(), "10.0.0.1");
        assert_eq!(
            record.get("ADVROUTER"),
            Some(&FieldValue::Text("10.0.0.1".to_string()))
        );
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let record = DumpRecord::parse("  LSATYPE=2 ATTACHED=10.0.0.2\n").unwrap();
        assert_eq!(record.require_int("LSATYPE").unwrap(), 2);
        assert_eq!(record.require_text("ATTACHED").unwrap(), "10.0.0.2");
    }

    #[test]
    fn test_token_without_separator_is_an_error() {
        let err = DumpRecord::parse("LSATYPE=1 garbage").unwrap_err();
        assert_eq!(err, RecordError::MissingSeparator("garbage".to_string()));
    }

    #[test]
    fn test_typed_accessor_mismatches() {
        let record = DumpRecord::parse("LSATYPE=1 LSAID=10.0.0.1").unwrap();
        assert_eq!(
            record.require_text("LSATYPE").unwrap_err(),
            RecordError::WrongType("LSATYPE")
        );
        assert_eq!(
            record.require_int("LSAID").unwrap_err(),
            RecordError::WrongType("LSAID")
        );
        assert_eq!(
            record.require_int("ATTACHED").unwrap_err(),
            RecordError::MissingKey("ATTACHED")
        );
    }
}
