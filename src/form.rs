use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use thiserror::Error;

use crate::prompt::build_feedback_prompt;
use crate::utils::trim_line;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassLevel {
    #[default]
    Class1,
    Class2,
    Class3,
    Class4,
    Class5,
}

impl ClassLevel {
    pub const ALL: [ClassLevel; 5] = [
        ClassLevel::Class1,
        ClassLevel::Class2,
        ClassLevel::Class3,
        ClassLevel::Class4,
        ClassLevel::Class5,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClassLevel::Class1 => "Class 1",
            ClassLevel::Class2 => "Class 2",
            ClassLevel::Class3 => "Class 3",
            ClassLevel::Class4 => "Class 4",
            ClassLevel::Class5 => "Class 5",
        }
    }

    fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|level| level == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClassLevel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = trim_line(value).ok_or_else(|| anyhow!("Class level cannot be empty"))?;
        ClassLevel::ALL
            .into_iter()
            .find(|level| {
                level.label().eq_ignore_ascii_case(&value)
                    || level.label().trim_start_matches("Class ") == value
            })
            .ok_or_else(|| anyhow!("Unknown class level '{value}', expected Class 1 to Class 5"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    ClassLevel,
    Topic,
    Essay,
}

/// Shown to the student when the generate action is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please provide your class level, essay topic, and write your essay.")]
pub struct MissingInput {
    pub fields: Vec<FormField>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormInput {
    pub class_level: Option<ClassLevel>,
    pub topic: String,
    pub essay: String,
}

impl Default for FormInput {
    fn default() -> Self {
        Self {
            class_level: Some(ClassLevel::default()),
            topic: String::new(),
            essay: String::new(),
        }
    }
}

/// Borrowed view of a form whose three fields are all present.
#[derive(Clone, Copy, Debug)]
pub struct ValidInput<'a> {
    pub class_level: ClassLevel,
    pub topic: &'a str,
    pub essay: &'a str,
}

impl ValidInput<'_> {
    pub fn prompt(&self) -> String {
        build_feedback_prompt(self.class_level.label(), self.topic, self.essay)
    }
}

impl FormInput {
    pub fn new(class_level: ClassLevel, topic: impl Into<String>, essay: impl Into<String>) -> Self {
        Self {
            class_level: Some(class_level),
            topic: topic.into(),
            essay: essay.into(),
        }
    }

    // Only zero-length text is missing; whitespace counts as an answer.
    pub fn validate(&self) -> Result<ValidInput<'_>, MissingInput> {
        let mut fields = Vec::new();
        if self.class_level.is_none() {
            fields.push(FormField::ClassLevel);
        }
        if self.topic.is_empty() {
            fields.push(FormField::Topic);
        }
        if self.essay.is_empty() {
            fields.push(FormField::Essay);
        }

        match self.class_level {
            Some(class_level) if fields.is_empty() => Ok(ValidInput {
                class_level,
                topic: &self.topic,
                essay: &self.essay,
            }),
            _ => Err(MissingInput { fields }),
        }
    }

    pub fn clear_writing(&mut self) {
        self.topic.clear();
        self.essay.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_preselects_first_grade() {
        let form = FormInput::default();
        assert_eq!(form.class_level, Some(ClassLevel::Class1));
        assert!(form.topic.is_empty());
        assert!(form.essay.is_empty());
    }

    #[test]
    fn class_level_cycles_and_wraps() {
        assert_eq!(ClassLevel::Class1.next(), ClassLevel::Class2);
        assert_eq!(ClassLevel::Class5.next(), ClassLevel::Class1);
        assert_eq!(ClassLevel::Class1.prev(), ClassLevel::Class5);
        assert_eq!(ClassLevel::Class3.prev(), ClassLevel::Class2);
    }

    #[test]
    fn class_level_parses_labels_and_numbers() {
        assert_eq!("Class 3".parse::<ClassLevel>().unwrap(), ClassLevel::Class3);
        assert_eq!(" class 5 ".parse::<ClassLevel>().unwrap(), ClassLevel::Class5);
        assert_eq!("2".parse::<ClassLevel>().unwrap(), ClassLevel::Class2);
        assert!("Class 6".parse::<ClassLevel>().is_err());
        assert!("".parse::<ClassLevel>().is_err());
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let form = FormInput {
            class_level: None,
            topic: String::new(),
            essay: String::new(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.fields,
            vec![FormField::ClassLevel, FormField::Topic, FormField::Essay]
        );
        assert_eq!(
            err.to_string(),
            "Please provide your class level, essay topic, and write your essay."
        );

        let form = FormInput::new(ClassLevel::Class2, "Trees", "");
        assert_eq!(form.validate().unwrap_err().fields, vec![FormField::Essay]);
    }

    #[test]
    fn whitespace_counts_as_present() {
        let form = FormInput::new(ClassLevel::Class1, " ", "\n");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn clear_writing_keeps_class_level() {
        let mut form = FormInput::new(ClassLevel::Class4, "Rain", "It rains.");
        form.clear_writing();
        assert_eq!(form.class_level, Some(ClassLevel::Class4));
        assert_eq!(form.topic, "");
        assert_eq!(form.essay, "");
    }
}
