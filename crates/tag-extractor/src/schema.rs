//! Declarative field schemas for the tagged wire format.

/// A single logical field and the tag that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Logical field name used to look the value up after extraction.
    pub name: String,
    /// Tag searched for in the response text. Case-sensitive, uppercase by
    /// convention.
    pub tag: String,
    /// Whether absence of the tag fails the whole extraction.
    pub required: bool,
    /// Strip trailing self-closing tag markup (e.g. `<DONE/>`) from the
    /// captured content.
    pub strip_trailing_markup: bool,
}

impl FieldDef {
    pub fn required(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            required: true,
            strip_trailing_markup: false,
        }
    }

    pub fn optional(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            required: false,
            strip_trailing_markup: false,
        }
    }

    pub fn with_stripped_markup(mut self) -> Self {
        self.strip_trailing_markup = true;
        self
    }
}

/// Ordered, closed set of fields for one extraction call.
///
/// Defined once per call and never mutated during extraction. Fields are
/// searched for in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldDef>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn push(&mut self, field: FieldDef) {
        self.fields.push(field);
    }

    /// Base schema for one exploration turn.
    ///
    /// The optional goal summary is the sole signal that the goal has been
    /// achieved.
    pub fn pilot_step() -> Self {
        Self::new(vec![
            FieldDef::required("screen_description", "SCREENDESCRIPTION"),
            FieldDef::required("thoughts", "THOUGHTS"),
            FieldDef::required("action", "ACTION"),
            FieldDef::optional("goal_summary", "GOALSUMMARY"),
        ])
    }

    /// Pilot-step schema extended with one required tag per caller-declared
    /// review section. Each section's content is later re-parsed with
    /// [`FieldSchema::review`].
    pub fn pilot_step_with_sections<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut schema = Self::pilot_step();
        for section in sections {
            let name = section.as_ref();
            schema.push(FieldDef::required(name, section_tag(name)));
        }
        schema
    }

    /// Free-form review text: summary, findings and score, all optional.
    pub fn review() -> Self {
        Self::new(vec![
            FieldDef::optional("summary", "SUMMARY"),
            FieldDef::optional("findings", "FINDINGS"),
            FieldDef::optional("score", "SCORE"),
        ])
    }

    /// Action-code responses: the command program plus an optional cache
    /// validation matcher.
    pub fn action_code() -> Self {
        Self::new(vec![
            FieldDef::required("code", "CODE"),
            FieldDef::optional("cache_validation_matcher", "CACHE_VALIDATION_MATCHER")
                .with_stripped_markup(),
        ])
    }
}

/// Derive the wire tag for a review-section name: upper-cased, with
/// non-alphanumeric runs collapsed to a single underscore.
pub fn section_tag(name: &str) -> String {
    let mut tag = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            tag.extend(ch.to_uppercase());
        } else if !tag.ends_with('_') && !tag.is_empty() {
            tag.push('_');
        }
    }
    tag.trim_end_matches('_').to_string()
}
