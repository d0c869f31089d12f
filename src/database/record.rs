use std::collections::HashMap;

/// Text fields submitted alongside a record write (multipart or urlencoded).
pub type FormFields = HashMap<String, String>;

/// Errors that can occur while turning submitted fields into a record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Please provide all required fields")]
    MissingRequiredFields(Vec<&'static str>),
    #[error("{message}")]
    BlankField {
        field: &'static str,
        message: String,
    },
}

/// A required field: present and not only whitespace.
pub fn required<'a>(fields: &'a FormFields, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// Values for every key in `keys`, in order. Fails listing each key that is
/// missing or blank.
pub fn required_all<'a, const N: usize>(
    fields: &'a FormFields,
    keys: [&'static str; N],
) -> Result<[&'a str; N], RecordError> {
    let mut values = [""; N];
    let mut missing = Vec::new();
    for (slot, key) in values.iter_mut().zip(keys) {
        match required(fields, key) {
            Some(value) => *slot = value,
            None => missing.push(key),
        }
    }

    if missing.is_empty() {
        Ok(values)
    } else {
        Err(RecordError::MissingRequiredFields(missing))
    }
}

/// An optional field in a partial update. Supplying it blank fails the
/// same "required" rule the create path enforces.
pub fn patched(
    fields: &FormFields,
    key: &'static str,
    message: &str,
    trim: bool,
) -> Result<Option<String>, RecordError> {
    match fields.get(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(RecordError::BlankField {
            field: key,
            message: message.to_string(),
        }),
        Some(value) if trim => Ok(Some(value.trim().to_string())),
        Some(value) => Ok(Some(value.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn blank_values_count_as_missing() {
        let f = fields(&[("projectName", "   "), ("projectDescription", "x")]);
        let err = required_all(&f, ["projectName", "projectDescription", "other"]).unwrap_err();
        assert!(matches!(
            err,
            RecordError::MissingRequiredFields(missing) if missing == vec!["projectName", "other"]
        ));
    }

    #[test]
    fn required_all_returns_values_in_order() {
        let f = fields(&[("b", "two"), ("a", "one")]);
        assert_eq!(required_all(&f, ["a", "b"]).unwrap(), ["one", "two"]);
    }

    #[test]
    fn patched_trims_only_when_asked() {
        let f = fields(&[("name", "  Ana "), ("bio", "  hi ")]);
        assert_eq!(patched(&f, "name", "", true).unwrap().as_deref(), Some("Ana"));
        assert_eq!(patched(&f, "bio", "", false).unwrap().as_deref(), Some("  hi "));
        assert!(patched(&f, "absent", "", true).unwrap().is_none());
    }

    #[test]
    fn patched_rejects_blank() {
        let f = fields(&[("name", "")]);
        let err = patched(&f, "name", "Client name is required", true).unwrap_err();
        assert!(matches!(err, RecordError::BlankField { field: "name", .. }));
        assert_eq!(err.to_string(), "Client name is required");
    }
}
