//! State holder for one date text field.
//!
//! The field owns the text buffer, the caret, the last value it emitted or
//! received, and the current validation messages. Every handler runs to
//! completion on `&mut self` and reports what the host should broadcast as
//! a list of [`FieldEvent`]s.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, ConfigError, DateValidator, FieldConfig, FormatPattern, MaskedInput, Month,
    RangeProgress, RangeValue, ValidationOutcome, ValidationState, apply_edit, display_text,
    normalize_date, paste_input,
};

/// One date as bound by the host: a date, or text in either format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Date(CalendarDate),
    Text(String),
}

/// The bindable value: one date, or a `[start, end]` list in range mode.
/// `None` (JSON `null`) is an empty field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelValue {
    One(DateValue),
    Many(Vec<DateValue>),
}

/// Notifications produced by field handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// New value in the return format
    UpdateModelValue(Option<ModelValue>),
    Focus,
    Blur,
    /// The calendar overlay was closed
    Closed,
    DateSelected(CalendarDate),
}

#[derive(Debug, Clone)]
pub struct DateTextField {
    config: FieldConfig,
    display: FormatPattern,
    ret: FormatPattern,
    validator: DateValidator,
    text: String,
    cursor: usize,
    model: Option<ModelValue>,
    state: ValidationState,
    picker_open: bool,
    focused: bool,
    calendar_view: Option<(i32, Month)>,
}

impl DateTextField {
    /// Builds a field from its configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if a pattern or rule cannot be compiled.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        let resolved = config.resolve()?;
        let validator = DateValidator::new(resolved.display.clone(), config.display_range, config.required)
            .with_messages(config.messages.clone())
            .with_rules(resolved.rules, resolved.warning_rules)
            .with_success_message(config.success_message.clone());

        Ok(Self {
            config,
            display: resolved.display,
            ret: resolved.ret,
            validator,
            text: String::new(),
            cursor: 0,
            model: None,
            state: ValidationState::default(),
            picker_open: false,
            focused: false,
            calendar_view: None,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn model_value(&self) -> Option<&ModelValue> {
        self.model.as_ref()
    }

    pub const fn validation(&self) -> &ValidationState {
        &self.state
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.state.error_messages()
    }

    pub fn has_error(&self) -> bool {
        self.state.has_error()
    }

    pub const fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub const fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    pub const fn calendar_view(&self) -> Option<(i32, Month)> {
        self.calendar_view
    }

    pub const fn display_format(&self) -> &FormatPattern {
        &self.display
    }

    pub const fn return_format(&self) -> &FormatPattern {
        &self.ret
    }

    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    const fn is_range(&self) -> bool {
        self.config.display_range
    }

    const fn is_editable(&self) -> bool {
        !self.config.disabled && !self.config.readonly
    }

    /// Dates currently held by the text, when it reads cleanly.
    pub fn dates(&self) -> Option<RangeValue<CalendarDate>> {
        self.validator.dates(&self.text)
    }

    /// Applies a value coming from the host and redisplays it.
    pub fn set_model_value(&mut self, value: Option<ModelValue>) {
        self.text = self.text_for(value.as_ref());
        self.cursor = self.text.chars().count();
        self.model = value;
    }

    /// Keystroke handler. `raw` is the widget text after the edit and
    /// `cursor` its caret; the returned input is what the widget should show.
    /// A range whose two dates are complete is committed right away.
    pub fn input(&mut self, raw: &str, cursor: usize) -> (MaskedInput, Vec<FieldEvent>) {
        if !self.is_editable() {
            return (self.masked(), Vec::new());
        }

        let masked = apply_edit(&self.text, raw, cursor, &self.display, self.is_range());
        self.text.clone_from(&masked.formatted);
        self.cursor = masked.cursor_pos;

        let events = if self.dates().is_some_and(|d| self.is_complete(&d)) {
            self.commit()
        } else {
            Vec::new()
        };
        (self.masked(), events)
    }

    /// Paste handler: the pasted text replaces `selection`, is reformatted
    /// and committed immediately.
    pub fn paste(&mut self, pasted: &str, selection: Range<usize>) -> (MaskedInput, Vec<FieldEvent>) {
        if !self.is_editable() {
            return (self.masked(), Vec::new());
        }

        let masked = paste_input(&self.text, selection, pasted, &self.display, self.is_range());
        self.text.clone_from(&masked.formatted);
        self.cursor = masked.cursor_pos;
        let events = self.commit();
        (self.masked(), events)
    }

    pub fn focus(&mut self) -> Vec<FieldEvent> {
        self.focused = true;
        vec![FieldEvent::Focus]
    }

    /// Commits the text and, when blur validation is on, validates it.
    pub fn blur(&mut self) -> Vec<FieldEvent> {
        self.focused = false;
        let mut events = self.commit();
        if self.config.is_validate_on_blur {
            self.validate_dates(false);
        }
        events.push(FieldEvent::Blur);
        events
    }

    /// Reads the text into dates, rewrites it with any normalized dates and
    /// emits the value in the return format if it changed. Text that does
    /// not read leaves the last known value in place.
    pub fn commit(&mut self) -> Vec<FieldEvent> {
        if self.text.trim().is_empty() {
            self.text.clear();
            self.cursor = 0;
            return self.emit(None);
        }

        let Some(dates) = self.dates() else {
            tracing::debug!(text = %self.text, "date text not committed");
            return Vec::new();
        };

        let normalized = RangeValue::from_text(&self.text, self.is_range())
            .iter()
            .any(|t| normalize_date(t, &self.display).was_normalized);
        if normalized || self.is_range() {
            let text = display_text(&dates.as_ref().map(|d| self.display.format(d)));
            if text != self.text {
                self.text = text;
                self.cursor = self.text.chars().count();
            }
        }

        let value = self.model_for(&dates);
        tracing::debug!(text = %self.text, "committed date text");
        self.emit(value)
    }

    /// Validates the current text. In range mode a missing end date is only
    /// an error when `force` is set; an end before the start always is.
    pub fn validate_dates(&mut self, force: bool) -> ValidationOutcome {
        let (state, outcome) = self.validator.validate_dates(&self.text, force);
        self.state = state;
        outcome
    }

    /// Forces validation as on form submission; `true` when valid.
    pub fn validate_on_submit(&mut self) -> bool {
        !self.validate_dates(true).has_error
    }

    /// Clears the text, the messages and the value, and closes the picker.
    pub fn reset(&mut self) -> Vec<FieldEvent> {
        self.text.clear();
        self.cursor = 0;
        self.state.clear();
        let mut events = self.close_date_picker();
        events.extend(self.emit(None));
        events
    }

    /// Disabling never leaves a blank field behind when a value is bound.
    pub fn set_disabled(&mut self, disabled: bool) -> Vec<FieldEvent> {
        self.config.disabled = disabled;
        if !disabled {
            return Vec::new();
        }
        self.resync_if_blank();
        self.close_date_picker()
    }

    pub const fn set_readonly(&mut self, readonly: bool) {
        self.config.readonly = readonly;
    }

    /// Text written by something other than the user, e.g. a form-level
    /// clear. A disabled field is restored from its bound value.
    pub fn set_text_externally(&mut self, text: &str) {
        self.text = text.to_owned();
        self.cursor = self.text.chars().count();
        if self.config.disabled {
            self.resync_if_blank();
        }
    }

    fn resync_if_blank(&mut self) {
        if self.text.is_empty() && self.model.is_some() {
            self.text = self.text_for(self.model.as_ref());
            self.cursor = self.text.chars().count();
            tracing::debug!(text = %self.text, "restored disabled date text from value");
        }
    }

    pub fn toggle_date_picker(&mut self) -> Vec<FieldEvent> {
        if self.picker_open {
            self.close_date_picker()
        } else {
            self.open_date_picker();
            Vec::new()
        }
    }

    /// Opens the calendar overlay on the month of the current start date.
    pub fn open_date_picker(&mut self) {
        if !self.config.show_picker || !self.is_editable() {
            return;
        }
        if let Some(start) = self.dates().as_ref().and_then(RangeValue::start) {
            self.calendar_view = Some((start.year(), start.month_typed()));
        }
        self.picker_open = true;
        tracing::debug!("date picker opened");
    }

    pub fn close_date_picker(&mut self) -> Vec<FieldEvent> {
        if !self.picker_open {
            return Vec::new();
        }
        self.picker_open = false;
        tracing::debug!("date picker closed");
        vec![FieldEvent::Closed]
    }

    /// The overlay navigated to another month.
    pub const fn calendar_view_changed(&mut self, year: i32, month: Month) {
        self.calendar_view = Some((year, month));
    }

    /// A date picked in the overlay. In range mode the first pick starts a
    /// new range and the second completes it, earliest date first.
    pub fn select_date(&mut self, date: CalendarDate) -> Vec<FieldEvent> {
        if !self.is_editable() {
            return Vec::new();
        }

        let mut events = vec![FieldEvent::DateSelected(date)];
        let dates = if self.is_range() {
            match self.dates() {
                Some(RangeValue::Pair { start, end: None }) => RangeValue::Pair {
                    start: start.min(date),
                    end: Some(start.max(date)),
                },
                _ => RangeValue::Pair { start: date, end: None },
            }
        } else {
            RangeValue::Single(Some(date))
        };

        self.text = display_text(&dates.as_ref().map(|d| self.display.format(d)));
        self.cursor = self.text.chars().count();
        self.calendar_view = Some((date.year(), date.month_typed()));

        let value = self.model_for(&dates);
        events.extend(self.emit(value));
        if self.is_complete(&dates) {
            events.extend(self.close_date_picker());
        }
        if self.state.has_error() {
            self.validate_dates(false);
        }
        events
    }

    /// "Today" shortcut; the host supplies the current date.
    pub fn select_today(&mut self, today: CalendarDate) -> Vec<FieldEvent> {
        self.select_date(today)
    }

    fn masked(&self) -> MaskedInput {
        MaskedInput {
            formatted: self.text.clone(),
            cursor_pos: self.cursor,
        }
    }

    fn is_complete(&self, dates: &RangeValue<CalendarDate>) -> bool {
        if self.is_range() {
            dates.progress() == RangeProgress::Complete
        } else {
            dates.progress() != RangeProgress::Empty
        }
    }

    fn emit(&mut self, value: Option<ModelValue>) -> Vec<FieldEvent> {
        if self.model == value {
            return Vec::new();
        }
        self.model.clone_from(&value);
        vec![FieldEvent::UpdateModelValue(value)]
    }

    fn model_for(&self, dates: &RangeValue<CalendarDate>) -> Option<ModelValue> {
        let out = |d: &CalendarDate| DateValue::Text(self.ret.format(d));
        match dates {
            RangeValue::Single(None) => None,
            RangeValue::Single(Some(d)) => Some(ModelValue::One(out(d))),
            RangeValue::Pair { .. } => Some(ModelValue::Many(dates.iter().map(out).collect())),
        }
    }

    /// Display text for one bound date: dates are formatted, text is read
    /// in the return format first, then the display format, else shown as is.
    fn date_text(&self, value: &DateValue) -> String {
        match value {
            DateValue::Date(d) => self.display.format(d),
            DateValue::Text(t) => self
                .ret
                .parse(t)
                .or_else(|| normalize_date(t, &self.display).normalized_date)
                .map_or_else(|| t.clone(), |d| self.display.format(&d)),
        }
    }

    fn text_for(&self, value: Option<&ModelValue>) -> String {
        let texts: Vec<String> = match value {
            None => Vec::new(),
            Some(ModelValue::One(v)) => vec![self.date_text(v)],
            Some(ModelValue::Many(vs)) => vs.iter().map(|v| self.date_text(v)).collect(),
        };

        let mut texts = texts.into_iter().filter(|t| !t.is_empty());
        let value = match (texts.next(), self.is_range()) {
            (None, _) => RangeValue::empty(),
            (Some(start), true) => RangeValue::Pair { start, end: texts.next() },
            (Some(start), false) => RangeValue::Single(Some(start)),
        };
        display_text(&value)
    }
}
