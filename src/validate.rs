use crate::{
    CalendarDate, ErrorMessages, FormatPattern, RangeValue, RuleKind, normalize_date,
    prelude::*,
    rules::Rule,
};

/// Why a field is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorKind {
    #[display(fmt = "required")]
    Required,
    #[display(fmt = "invalid-format")]
    InvalidFormat,
    #[display(fmt = "end-before-start")]
    EndBeforeStart,
    /// Range submitted with only its start date
    #[display(fmt = "end-required")]
    EndRequired,
    #[display(fmt = "{_0}")]
    Custom(RuleKind),
}

/// An error with the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{message}")]
pub struct ValidationMessage {
    pub kind: ErrorKind,
    pub message: String,
}

/// Messages produced by the last validation; empty errors means valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationState {
    pub errors: Vec<ValidationMessage>,
    pub warnings: Vec<String>,
    pub successes: Vec<String>,
}

impl ValidationState {
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
        self.successes.clear();
    }

    fn error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(ValidationMessage {
            kind,
            message: message.into(),
        });
    }
}

/// Result of [`DateValidator::validate_dates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValidationOutcome {
    pub has_error: bool,
}

/// Required, format, order and custom-rule checks over field text.
#[derive(Debug, Clone)]
pub struct DateValidator {
    display: FormatPattern,
    range: bool,
    required: bool,
    messages: ErrorMessages,
    rules: Vec<Rule>,
    warning_rules: Vec<Rule>,
    success_message: Option<String>,
}

impl DateValidator {
    pub fn new(display: FormatPattern, range: bool, required: bool) -> Self {
        Self {
            display,
            range,
            required,
            messages: ErrorMessages::default(),
            rules: Vec::new(),
            warning_rules: Vec::new(),
            success_message: None,
        }
    }

    #[must_use]
    pub fn with_messages(mut self, messages: ErrorMessages) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub(crate) fn with_rules(mut self, rules: Vec<Rule>, warning_rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self.warning_rules = warning_rules;
        self
    }

    #[must_use]
    pub fn with_success_message(mut self, message: Option<String>) -> Self {
        self.success_message = message;
        self
    }

    /// Validates field text.
    ///
    /// An empty required field always fails. In range mode a missing end
    /// date only fails when `force` is set (submit), while an end before the
    /// start fails either way. Custom rules run once the text reads as dates.
    pub fn validate(&self, text: &str, force: bool) -> ValidationState {
        let mut state = ValidationState::default();

        let Some(value) = self.read(text, force, &mut state) else {
            return state;
        };

        if value.is_empty() {
            if self.required {
                state.error(ErrorKind::Required, &self.messages.required);
            }
            return state;
        }

        if value.is_misordered() {
            state.error(ErrorKind::EndBeforeStart, &self.messages.end_before_start);
        }

        for rule in self.rules.iter().filter(|r| !r.passes(&value)) {
            state.error(ErrorKind::Custom(rule.kind()), rule.message());
        }
        for rule in self.warning_rules.iter().filter(|r| !r.passes(&value)) {
            state.warnings.push(rule.message().to_owned());
        }

        if !state.has_error() {
            state.successes.extend(self.success_message.iter().cloned());
        }

        tracing::debug!(
            text,
            force,
            errors = state.errors.len(),
            warnings = state.warnings.len(),
            "validated date field"
        );
        state
    }

    /// Validates and reports only whether an error was found.
    pub fn validate_dates(&self, text: &str, force: bool) -> (ValidationState, ValidationOutcome) {
        let state = self.validate(text, force);
        let outcome = ValidationOutcome {
            has_error: state.has_error(),
        };
        (state, outcome)
    }

    /// Reads text into dates, recording format and completeness errors.
    /// `None` means the text could not be read any further.
    fn read(&self, text: &str, force: bool, state: &mut ValidationState) -> Option<RangeValue<CalendarDate>> {
        let value = RangeValue::from_text(text, self.range);
        if value.is_empty() {
            return Some(RangeValue::empty());
        }

        let format_error = self.messages.invalid_format_for(&self.display);
        let dates = value.try_map(|t| normalize_date(&t, &self.display).normalized_date);
        let Some(dates) = dates else {
            state.error(ErrorKind::InvalidFormat, format_error);
            return None;
        };

        if self.range && dates.end().is_none() && force {
            state.error(ErrorKind::EndRequired, &self.messages.end_required);
        }
        Some(dates)
    }

    /// Start/end dates of `text`, if every boundary present reads as a date.
    pub fn dates(&self, text: &str) -> Option<RangeValue<CalendarDate>> {
        RangeValue::from_text(text, self.range).try_map(|t| normalize_date(&t, &self.display).normalized_date)
    }
}
