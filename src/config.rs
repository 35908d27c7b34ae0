use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_FORMAT, FORMAT_PLACEHOLDER, FormatPattern, PatternError, RuleDescriptor, RuleKind,
    consts::{MSG_END_BEFORE_START, MSG_END_REQUIRED, MSG_INVALID_FORMAT, MSG_REQUIRED},
    rules::Rule,
};

/// Error type for field configuration that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid display format: {0}")]
    DisplayFormat(#[source] PatternError),

    #[error("Invalid return format: {0}")]
    ReturnFormat(#[source] PatternError),

    #[error("Rule {rule} has an unreadable date: {date}")]
    InvalidRuleDate { rule: RuleKind, date: String },
}

/// User-facing messages, one per failure condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorMessages {
    pub required: String,
    /// `{format}` is replaced with the display pattern
    pub invalid_format: String,
    pub end_before_start: String,
    pub end_required: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            required: MSG_REQUIRED.to_owned(),
            invalid_format: MSG_INVALID_FORMAT.to_owned(),
            end_before_start: MSG_END_BEFORE_START.to_owned(),
            end_required: MSG_END_REQUIRED.to_owned(),
        }
    }
}

impl ErrorMessages {
    pub(crate) fn invalid_format_for(&self, pattern: &FormatPattern) -> String {
        self.invalid_format.replace(FORMAT_PLACEHOLDER, pattern.as_str())
    }
}

/// Options of a date text field, named after the component properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Pattern the user types and sees
    pub format: String,
    /// Pattern of emitted values; the display pattern when absent
    pub date_format_return: Option<String>,
    pub display_range: bool,
    pub required: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub is_validate_on_blur: bool,
    /// Calendar overlay variant
    pub show_picker: bool,
    pub custom_rules: Vec<RuleDescriptor>,
    pub custom_warning_rules: Vec<RuleDescriptor>,
    pub success_message: Option<String>,
    pub messages: ErrorMessages,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_owned(),
            date_format_return: None,
            display_range: false,
            required: false,
            disabled: false,
            readonly: false,
            is_validate_on_blur: true,
            show_picker: false,
            custom_rules: Vec::new(),
            custom_warning_rules: Vec::new(),
            success_message: None,
            messages: ErrorMessages::default(),
        }
    }
}

/// Compiled form of a [`FieldConfig`].
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub display: FormatPattern,
    pub ret: FormatPattern,
    pub rules: Vec<Rule>,
    pub warning_rules: Vec<Rule>,
}

impl FieldConfig {
    /// Checks both patterns and every rule.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolve().map(|_| ())
    }

    pub(crate) fn resolve(&self) -> Result<Resolved, ConfigError> {
        let display = FormatPattern::new(&self.format).map_err(ConfigError::DisplayFormat)?;
        let ret = match &self.date_format_return {
            Some(source) => FormatPattern::new(source).map_err(ConfigError::ReturnFormat)?,
            None => display.clone(),
        };
        let rules = self
            .custom_rules
            .iter()
            .map(|r| r.compile(&display))
            .collect::<Result<Vec<_>, _>>()?;
        let warning_rules = self
            .custom_warning_rules
            .iter()
            .map(|r| r.compile(&display))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Resolved {
            display,
            ret,
            rules,
            warning_rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FieldConfig::default();
        assert_eq!(config.format, "DD/MM/YYYY");
        assert!(config.is_validate_on_blur);
        assert!(!config.display_range);
        assert_eq!(config.messages.required, "La date est requise.");

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.display, resolved.ret);
    }

    #[test]
    fn test_from_json_with_component_names() {
        let json = r#"{
            "format": "DD/MM/YYYY",
            "dateFormatReturn": "YYYY-MM-DD",
            "displayRange": true,
            "required": true,
            "isValidateOnBlur": false,
            "customRules": [{"type": "notAfterDate", "options": {"date": "31/12/2030"}}],
            "messages": {"required": "Champ obligatoire"}
        }"#;
        let config: FieldConfig = serde_json::from_str(json).unwrap();
        assert!(config.display_range);
        assert!(config.required);
        assert!(!config.is_validate_on_blur);
        assert_eq!(config.messages.required, "Champ obligatoire");
        // Unset messages keep their defaults
        assert_eq!(config.messages.end_required, MSG_END_REQUIRED);

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.ret, FormatPattern::iso());
        assert_eq!(resolved.rules.len(), 1);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config: FieldConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FieldConfig::default());
    }

    #[test]
    fn test_invalid_formats() {
        let config = FieldConfig {
            format: "DD/MM".to_owned(),
            ..FieldConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::DisplayFormat(_))));

        let config = FieldConfig {
            format: "D/M/YYYY".to_owned(),
            ..FieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DisplayFormat(PatternError::UnsupportedWidth { width: 1, .. }))
        ));

        let config = FieldConfig {
            date_format_return: Some("YYYY".to_owned()),
            ..FieldConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ReturnFormat(_))));
    }

    #[test]
    fn test_invalid_rule_date() {
        let config = FieldConfig {
            custom_warning_rules: vec![RuleDescriptor::NotBeforeDate {
                date: "32/01/2025".to_owned(),
                message: None,
            }],
            ..FieldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRuleDate {
                rule: RuleKind::NotBeforeDate,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_format_message() {
        let messages = ErrorMessages::default();
        assert_eq!(
            messages.invalid_format_for(&FormatPattern::default()),
            "Format de date invalide (DD/MM/YYYY)"
        );
    }
}
