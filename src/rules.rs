use serde::{Deserialize, Serialize};

use crate::{CalendarDate, ConfigError, FormatPattern, RangeValue, prelude::*};

/// Identifies which custom rule produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RuleKind {
    #[display(fmt = "notBeforeDate")]
    NotBeforeDate,
    #[display(fmt = "notAfterDate")]
    NotAfterDate,
    #[display(fmt = "dateExactMatch")]
    DateExactMatch,
    #[display(fmt = "maxRangeDays")]
    MaxRangeDays,
}

/// A `{ "type": ..., "options": { ... } }` rule from field configuration.
///
/// Reference dates are written in the field's display format or as ISO
/// `YYYY-MM-DD`. Messages may use `{date}` / `{days}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "camelCase")]
pub enum RuleDescriptor {
    NotBeforeDate {
        date: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    NotAfterDate {
        date: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    DateExactMatch {
        date: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    MaxRangeDays {
        days: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// A descriptor with its reference date resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rule {
    kind: RuleKind,
    limit: Limit,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Limit {
    Date(CalendarDate),
    Days(u32),
}

impl RuleDescriptor {
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::NotBeforeDate { .. } => RuleKind::NotBeforeDate,
            Self::NotAfterDate { .. } => RuleKind::NotAfterDate,
            Self::DateExactMatch { .. } => RuleKind::DateExactMatch,
            Self::MaxRangeDays { .. } => RuleKind::MaxRangeDays,
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            Self::NotBeforeDate { .. } => "La date doit être postérieure ou égale au {date}.",
            Self::NotAfterDate { .. } => "La date doit être antérieure ou égale au {date}.",
            Self::DateExactMatch { .. } => "La date doit être le {date}.",
            Self::MaxRangeDays { .. } => "La période ne peut pas dépasser {days} jours.",
        }
    }

    /// Resolves the reference date and renders the message.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRuleDate` if the reference date parses
    /// neither with `display` nor as ISO.
    pub(crate) fn compile(&self, display: &FormatPattern) -> Result<Rule, ConfigError> {
        let kind = self.kind();
        let (limit, message) = match self {
            Self::NotBeforeDate { date, message }
            | Self::NotAfterDate { date, message }
            | Self::DateExactMatch { date, message } => {
                let resolved = display
                    .parse(date)
                    .or_else(|| date.parse::<CalendarDate>().ok())
                    .ok_or_else(|| ConfigError::InvalidRuleDate {
                        rule: kind,
                        date: date.clone(),
                    })?;
                (Limit::Date(resolved), message)
            }
            Self::MaxRangeDays { days, message } => (Limit::Days(*days), message),
        };

        let template = message.as_deref().unwrap_or_else(|| self.default_message());
        let message = match limit {
            Limit::Date(date) => template.replace("{date}", &display.format(&date)),
            Limit::Days(days) => template.replace("{days}", &days.to_string()),
        };

        Ok(Rule { kind, limit, message })
    }
}

impl Rule {
    pub(crate) const fn kind(&self) -> RuleKind {
        self.kind
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    /// Whether every present boundary satisfies the rule.
    pub(crate) fn passes(&self, value: &RangeValue<CalendarDate>) -> bool {
        match self.limit {
            Limit::Date(limit) => value.iter().all(|d| match self.kind {
                RuleKind::NotBeforeDate => *d >= limit,
                RuleKind::NotAfterDate => *d <= limit,
                RuleKind::DateExactMatch => *d == limit,
                RuleKind::MaxRangeDays => true,
            }),
            Limit::Days(days) => match value {
                RangeValue::Pair { start, end: Some(end) } => start.days_until(end) <= i64::from(days),
                _ => true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, fr};

    fn single(d: CalendarDate) -> RangeValue<CalendarDate> {
        RangeValue::Single(Some(d))
    }

    #[test]
    fn test_descriptor_serde_shape() {
        let json = r#"[
            {"type": "notBeforeDate", "options": {"date": "01/01/2025"}},
            {"type": "maxRangeDays", "options": {"days": 30, "message": "Trop long"}}
        ]"#;
        let rules: Vec<RuleDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(
            rules,
            vec![
                RuleDescriptor::NotBeforeDate {
                    date: "01/01/2025".to_owned(),
                    message: None,
                },
                RuleDescriptor::MaxRangeDays {
                    days: 30,
                    message: Some("Trop long".to_owned()),
                },
            ]
        );
        assert_eq!(rules[1].kind().to_string(), "maxRangeDays");
    }

    #[test]
    fn test_compile_accepts_display_and_iso_dates() {
        let display = RuleDescriptor::NotAfterDate {
            date: "31/12/2025".to_owned(),
            message: None,
        };
        let iso = RuleDescriptor::NotAfterDate {
            date: "2025-12-31".to_owned(),
            message: None,
        };
        assert_eq!(display.compile(&fr()).unwrap(), iso.compile(&fr()).unwrap());
    }

    #[test]
    fn test_compile_rejects_bad_date() {
        let rule = RuleDescriptor::NotBeforeDate {
            date: "demain".to_owned(),
            message: None,
        };
        assert_eq!(
            rule.compile(&fr()),
            Err(ConfigError::InvalidRuleDate {
                rule: RuleKind::NotBeforeDate,
                date: "demain".to_owned(),
            })
        );
    }

    #[test]
    fn test_messages_render_placeholders() {
        let rule = RuleDescriptor::NotBeforeDate {
            date: "2025-01-01".to_owned(),
            message: None,
        }
        .compile(&fr())
        .unwrap();
        assert_eq!(rule.message(), "La date doit être postérieure ou égale au 01/01/2025.");

        let rule = RuleDescriptor::MaxRangeDays {
            days: 7,
            message: Some("Max {days} j".to_owned()),
        }
        .compile(&fr())
        .unwrap();
        assert_eq!(rule.message(), "Max 7 j");
    }

    #[test]
    fn test_date_rules() {
        let not_before = RuleDescriptor::NotBeforeDate {
            date: "01/01/2025".to_owned(),
            message: None,
        }
        .compile(&fr())
        .unwrap();
        assert!(not_before.passes(&single(date(2025, 1, 1))));
        assert!(!not_before.passes(&single(date(2024, 12, 31))));
        assert!(!not_before.passes(&RangeValue::Pair {
            start: date(2024, 12, 31),
            end: Some(date(2025, 2, 1)),
        }));
        assert!(not_before.passes(&RangeValue::empty()));

        let not_after = RuleDescriptor::NotAfterDate {
            date: "01/01/2025".to_owned(),
            message: None,
        }
        .compile(&fr())
        .unwrap();
        assert!(not_after.passes(&single(date(2024, 12, 31))));
        assert!(!not_after.passes(&single(date(2025, 1, 2))));

        let exact = RuleDescriptor::DateExactMatch {
            date: "14/07/2025".to_owned(),
            message: None,
        }
        .compile(&fr())
        .unwrap();
        assert!(exact.passes(&single(date(2025, 7, 14))));
        assert!(!exact.passes(&single(date(2025, 7, 15))));
    }

    #[test]
    fn test_max_range_days() {
        let rule = RuleDescriptor::MaxRangeDays {
            days: 7,
            message: None,
        }
        .compile(&fr())
        .unwrap();
        let within = RangeValue::Pair {
            start: date(2025, 1, 1),
            end: Some(date(2025, 1, 8)),
        };
        let beyond = RangeValue::Pair {
            start: date(2025, 1, 1),
            end: Some(date(2025, 1, 9)),
        };
        assert!(rule.passes(&within));
        assert!(!rule.passes(&beyond));
        assert!(rule.passes(&single(date(2025, 1, 1))));
    }
}
