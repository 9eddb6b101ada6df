//! Span-consuming extraction of tagged fields.

use std::collections::HashMap;

use regex::Regex;

use crate::errors::ExtractionError;
use crate::schema::FieldSchema;

/// Fields recovered from one model response.
///
/// Every schema field has an entry; optional fields that were absent map to
/// an explicit `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    values: HashMap<String, Option<String>>,
}

impl ExtractedFields {
    /// Value of a present field, `None` when absent or unknown.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    /// Whether the field was present in the response text.
    pub fn is_present(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(Some(_)))
    }

    /// Value of a field the caller's schema declared required.
    pub fn required(&self, name: &str) -> Result<&str, ExtractionError> {
        self.get(name)
            .ok_or_else(|| ExtractionError::missing_tag(name))
    }
}

/// Extract every schema field from `text`.
///
/// Fields are searched for in declaration order; each match is removed from
/// the working text before the next field is searched, so duplicate tags do
/// not cross-contaminate two fields sharing a tag. A missing required field
/// fails immediately with no partial result.
pub fn extract(text: &str, schema: &FieldSchema) -> Result<ExtractedFields, ExtractionError> {
    let mut remaining = text.to_string();
    let mut values = HashMap::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let pattern = format!(
            "(?s)<{tag}>(.*?)</{tag}>",
            tag = regex::escape(&field.tag)
        );
        let re = Regex::new(&pattern).expect("escaped tag literal is a valid pattern");

        let captured = re.captures(&remaining).and_then(|caps| {
            let span = caps.get(0)?.range();
            let body = caps.get(1)?.as_str().trim().to_string();
            Some((span, body))
        });

        match captured {
            Some((span, body)) => {
                remaining.replace_range(span, "");
                let body = if field.strip_trailing_markup {
                    strip_trailing_self_closing(&body)
                } else {
                    body
                };
                values.insert(field.name.clone(), Some(body));
            }
            None if field.required => {
                return Err(ExtractionError::missing_tag(&field.tag));
            }
            None => {
                values.insert(field.name.clone(), None);
            }
        }
    }

    Ok(ExtractedFields { values })
}

/// Drop trailing self-closing tag markup (e.g. `<DONE/>`) some models append
/// after a field body.
fn strip_trailing_self_closing(body: &str) -> String {
    let re = Regex::new(r"(?:\s*<[A-Za-z0-9_]+\s*/>)+\s*$")
        .expect("static pattern is valid");
    re.replace(body, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDef, FieldSchema};

    #[test]
    fn test_round_trip_all_fields_present() {
        let text = "prefix noise\n\
                    <SCREENDESCRIPTION>Login screen with two fields</SCREENDESCRIPTION>\n\
                    <THOUGHTS>The username field is empty</THOUGHTS>\n\
                    <ACTION>Type \"demo\" into the username field</ACTION>\n\
                    trailing noise";
        let fields = extract(text, &FieldSchema::pilot_step()).unwrap();

        assert_eq!(
            fields.get("screen_description"),
            Some("Login screen with two fields")
        );
        assert_eq!(fields.get("thoughts"), Some("The username field is empty"));
        assert_eq!(
            fields.get("action"),
            Some("Type \"demo\" into the username field")
        );
        assert!(!fields.is_present("goal_summary"));
        assert_eq!(fields.get("goal_summary"), None);
    }

    #[test]
    fn test_goal_summary_presence_detected() {
        let text = "<SCREENDESCRIPTION>Done screen</SCREENDESCRIPTION>\
                    <THOUGHTS>Everything finished</THOUGHTS>\
                    <ACTION>None</ACTION>\
                    <GOALSUMMARY>The goal was achieved</GOALSUMMARY>";
        let fields = extract(text, &FieldSchema::pilot_step()).unwrap();
        assert!(fields.is_present("goal_summary"));
        assert_eq!(fields.get("goal_summary"), Some("The goal was achieved"));
    }

    #[test]
    fn test_missing_required_tag_fails_without_partial_result() {
        let text = "<SCREENDESCRIPTION>Some screen</SCREENDESCRIPTION>\
                    <THOUGHTS>thinking</THOUGHTS>";
        let err = extract(text, &FieldSchema::pilot_step()).unwrap_err();
        assert_eq!(err, ExtractionError::missing_tag("ACTION"));
    }

    #[test]
    fn test_duplicate_tags_consume_distinct_spans() {
        let schema = FieldSchema::new(vec![
            FieldDef::required("first", "SUMMARY"),
            FieldDef::required("second", "SUMMARY"),
        ]);
        let text = "<SUMMARY>one</SUMMARY> gap <SUMMARY>two</SUMMARY>";
        let fields = extract(text, &schema).unwrap();
        assert_eq!(fields.get("first"), Some("one"));
        assert_eq!(fields.get("second"), Some("two"));
    }

    #[test]
    fn test_multiline_bodies_are_trimmed() {
        let schema = FieldSchema::new(vec![FieldDef::required("code", "CODE")]);
        let text = "<CODE>\n{\"call\": \"tap\"}\n</CODE>";
        let fields = extract(text, &schema).unwrap();
        assert_eq!(fields.get("code"), Some("{\"call\": \"tap\"}"));
    }

    #[test]
    fn test_trailing_self_closing_markup_stripped_from_matcher() {
        let text = "<CODE>{\"call\": \"tap\"}</CODE>\
                    <CACHE_VALIDATION_MATCHER>title == \"Home\" <DONE/></CACHE_VALIDATION_MATCHER>";
        let fields = extract(text, &FieldSchema::action_code()).unwrap();
        assert_eq!(
            fields.get("cache_validation_matcher"),
            Some("title == \"Home\"")
        );
    }

    #[test]
    fn test_review_schema_all_optional() {
        let text = "<SUMMARY>Looks consistent</SUMMARY>";
        let fields = extract(text, &FieldSchema::review()).unwrap();
        assert_eq!(fields.get("summary"), Some("Looks consistent"));
        assert!(!fields.is_present("findings"));
        assert!(!fields.is_present("score"));
    }

    #[test]
    fn test_required_accessor_reports_missing_field() {
        let fields = extract("<SUMMARY>s</SUMMARY>", &FieldSchema::review()).unwrap();
        assert!(fields.required("summary").is_ok());
        assert!(fields.required("score").is_err());
    }
}
