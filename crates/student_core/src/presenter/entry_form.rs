//! Entry form for creating or editing one student.
//!
//! # Invariants
//! - Submission is rejected only when name, grade and course are all empty.
//! - Emptiness is checked on the raw text; whitespace counts as content.
//! - Grade text must parse as `i32` before anything reaches storage.

use crate::model::student::Student;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Notification shown when every field is left blank.
pub const MISSING_DETAILS_MESSAGE: &str = "Enter student details!";

/// Whether the form creates a new row or edits the row at a list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { position: usize },
}

/// Form submission errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// All three fields are empty.
    MissingDetails,
    /// Grade text is not a decimal integer.
    InvalidGrade(String),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDetails => write!(f, "{MISSING_DETAILS_MESSAGE}"),
            Self::InvalidGrade(value) => write!(f, "invalid grade: `{value}`"),
        }
    }
}

impl Error for FormError {}

impl FormError {
    /// Stable log code; never includes the typed text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingDetails => "missing_details",
            Self::InvalidGrade(_) => "invalid_grade",
        }
    }
}

/// Parsed field values ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    pub name: String,
    pub grade: i32,
    pub course: String,
}

/// Raw text state of the student dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    mode: FormMode,
    pub name: String,
    pub grade: String,
    pub course: String,
}

impl EntryForm {
    /// Opens the form in create or edit mode.
    ///
    /// Fields are prefilled only when `should_update` is set and a target
    /// is supplied; otherwise the form falls back to a blank create form.
    pub fn open(should_update: bool, target: Option<(usize, &Student)>) -> Self {
        match (should_update, target) {
            (true, Some((position, student))) => Self {
                mode: FormMode::Edit { position },
                name: student.name.clone(),
                grade: student.grade.to_string(),
                course: student.course.clone(),
            },
            _ => Self {
                mode: FormMode::Create,
                name: String::new(),
                grade: String::new(),
                course: String::new(),
            },
        }
    }

    /// Blank form for a new student.
    pub fn create() -> Self {
        Self::open(false, None)
    }

    /// Form prefilled from the student shown at `position`.
    pub fn edit(position: usize, student: &Student) -> Self {
        Self::open(true, Some((position, student)))
    }

    /// Replaces all three text fields, as a host would after user input.
    pub fn with_fields(
        mut self,
        name: impl Into<String>,
        grade: impl Into<String>,
        course: impl Into<String>,
    ) -> Self {
        self.name = name.into();
        self.grade = grade.into();
        self.course = course.into();
        self
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_update(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn title(&self) -> &'static str {
        if self.is_update() {
            "Edit Student"
        } else {
            "New Student"
        }
    }

    pub fn positive_label(&self) -> &'static str {
        if self.is_update() {
            "update"
        } else {
            "save"
        }
    }

    pub fn negative_label(&self) -> &'static str {
        "cancel"
    }

    /// Presence check only. A single filled field passes.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.is_empty() && self.grade.is_empty() && self.course.is_empty() {
            return Err(FormError::MissingDetails);
        }
        Ok(())
    }

    /// Validates and parses the form into a draft.
    pub fn submit(&self) -> Result<StudentDraft, FormError> {
        self.validate()?;
        let grade = self
            .grade
            .parse::<i32>()
            .map_err(|_| FormError::InvalidGrade(self.grade.clone()))?;

        Ok(StudentDraft {
            name: self.name.clone(),
            grade,
            course: self.course.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryForm, FormError, FormMode, MISSING_DETAILS_MESSAGE};
    use crate::model::student::Student;

    fn sample() -> Student {
        Student {
            id: 7,
            name: "Ana".to_string(),
            grade: 5,
            course: "Math".to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn create_form_is_blank() {
        let form = EntryForm::create();
        assert_eq!(form.mode(), FormMode::Create);
        assert!(form.name.is_empty() && form.grade.is_empty() && form.course.is_empty());
        assert_eq!(form.title(), "New Student");
        assert_eq!(form.positive_label(), "save");
    }

    #[test]
    fn edit_form_prefills_fields() {
        let student = sample();
        let form = EntryForm::edit(3, &student);
        assert_eq!(form.mode(), FormMode::Edit { position: 3 });
        assert_eq!(form.name, "Ana");
        assert_eq!(form.grade, "5");
        assert_eq!(form.course, "Math");
        assert_eq!(form.title(), "Edit Student");
        assert_eq!(form.positive_label(), "update");
    }

    #[test]
    fn update_flag_without_target_falls_back_to_create() {
        let form = EntryForm::open(true, None);
        assert_eq!(form.mode(), FormMode::Create);
    }

    #[test]
    fn all_empty_is_rejected_with_user_message() {
        let err = EntryForm::create().submit().unwrap_err();
        assert_eq!(err, FormError::MissingDetails);
        assert_eq!(err.to_string(), MISSING_DETAILS_MESSAGE);
    }

    #[test]
    fn grade_alone_passes_validation() {
        let form = EntryForm::create().with_fields("", "9", "");
        let draft = form.submit().unwrap();
        assert_eq!(draft.grade, 9);
        assert!(draft.name.is_empty());
    }

    #[test]
    fn whitespace_counts_as_content() {
        let form = EntryForm::create().with_fields(" ", "", "");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn partial_fill_without_grade_fails_parse() {
        let form = EntryForm::create().with_fields("Ana", "", "Math");
        assert!(form.validate().is_ok());
        assert_eq!(
            form.submit().unwrap_err(),
            FormError::InvalidGrade(String::new())
        );
    }

    #[test]
    fn non_numeric_grade_is_rejected() {
        let form = EntryForm::create().with_fields("Ana", "five", "Math");
        assert!(matches!(form.submit(), Err(FormError::InvalidGrade(value)) if value == "five"));
    }

    #[test]
    fn error_codes_omit_user_text() {
        let err = FormError::InvalidGrade("secret".to_string());
        assert_eq!(err.code(), "invalid_grade");
        assert_eq!(FormError::MissingDetails.code(), "missing_details");
    }
}
