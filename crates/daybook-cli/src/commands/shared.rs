use daybook_core::TaskDate;
use serde_json::{Map, Value};

/// The explicit `--date`, or today's date in UTC.
pub fn date_or_today(date: Option<TaskDate>) -> TaskDate {
    date.unwrap_or_else(TaskDate::today)
}

/// Parse repeated `field=value` assignments into a JSON object.
///
/// Values that parse as JSON keep their type (`40`, `true`, `null`,
/// `["a","b"]`); anything else is taken as a plain string.
pub fn parse_assignments(assignments: &[String]) -> anyhow::Result<Map<String, Value>> {
    let mut fields = Map::new();
    for assignment in assignments {
        let Some((field, raw)) = assignment.split_once('=') else {
            anyhow::bail!("invalid --set '{assignment}': expected FIELD=VALUE");
        };
        let field = field.trim();
        if field.is_empty() {
            anyhow::bail!("invalid --set '{assignment}': field name is empty");
        }
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(field.to_string(), value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::parse_assignments;

    #[test]
    fn keeps_json_types_and_falls_back_to_strings() {
        let fields = parse_assignments(&[
            "progress=40".to_string(),
            "title=Write the RFC".to_string(),
            "tags=[\"docs\"]".to_string(),
            "time_block=null".to_string(),
        ])
        .expect("assignments should parse");

        assert_eq!(fields["progress"], json!(40));
        assert_eq!(fields["title"], json!("Write the RFC"));
        assert_eq!(fields["tags"], json!(["docs"]));
        assert_eq!(fields["time_block"], json!(null));
    }

    #[test]
    fn rejects_missing_separator() {
        let err = parse_assignments(&["progress".to_string()]).expect_err("should fail");
        assert!(err.to_string().contains("FIELD=VALUE"));
    }

    #[test]
    fn value_may_contain_equals() {
        let fields = parse_assignments(&["note=a=b".to_string()]).expect("should parse");
        assert_eq!(fields["note"], json!("a=b"));
    }
}
