//! Form inputs as the screens hold them, with client-side checks that
//! produce the same `FieldErrors` the backend returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ApiError, FieldErrors};
use crate::http::Multipart;
use crate::models::{ContentType, Level};

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let key = if field == "__all__" {
                "general".to_string()
            } else {
                field.to_string()
            };
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {key}."));
                out.insert(key.clone(), message);
            }
        }
        out
    }
}

pub trait FormInput: Validate {
    fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

fn decimal(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n >= 0.0 && n.is_finite() => Ok(()),
        _ => Err(ValidationError::new("decimal")),
    }
}

fn whole_number(value: &str) -> Result<(), ValidationError> {
    value
        .trim()
        .parse::<u32>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("whole_number"))
}

fn optional_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("date"))
    }
}

// ── Accounts ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

impl FormInput for LoginForm {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub password2: String,
}

impl FormInput for SignupForm {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    pub bio: String,
}

impl FormInput for ProfileForm {}

impl ProfileForm {
    pub fn multipart<F>(&self, profile_image: Option<F>) -> Multipart<F> {
        Multipart::new()
            .text("first_name", &self.first_name)
            .text("last_name", &self.last_name)
            .text("email", &self.email)
            .text("bio", &self.bio)
            .file_if_set("profile_image", profile_image)
    }
}

// ── Courses ──

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CourseForm {
    #[validate(length(min = 1, message = "Course name is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: String,
    #[validate(custom(function = "decimal", message = "A valid number is required."))]
    pub price: String,
    #[validate(custom(function = "optional_date", message = "Use the YYYY-MM-DD format."))]
    pub launch_date: String,
    #[validate(custom(function = "whole_number", message = "A valid integer is required."))]
    pub duration: String,
    pub level: Level,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            launch_date: String::new(),
            duration: String::new(),
            level: Level::Beginner,
        }
    }
}

impl FormInput for CourseForm {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
    pub duration: u32,
    pub level: Level,
}

impl CourseForm {
    pub fn to_request(&self) -> Result<NewCourse, FieldErrors> {
        self.check()?;
        let launch_date = Some(self.launch_date.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(NewCourse {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            price: self.price.trim().to_string(),
            launch_date,
            duration: self.duration.trim().parse().unwrap_or_default(),
            level: self.level,
        })
    }
}

/// PATCH body for the author's inline edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CourseUpdate {
    #[validate(length(min = 1, message = "Course name is required."))]
    pub name: String,
    pub description: String,
    #[validate(custom(function = "decimal", message = "A valid number is required."))]
    pub price: String,
}

impl FormInput for CourseUpdate {}

// ── Modules ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModuleForm {
    /// Course slug.
    pub course: String,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    pub description: String,
    pub order: u32,
    pub is_published: bool,
}

impl ModuleForm {
    pub fn for_course(slug: &str) -> Self {
        Self {
            course: slug.to_string(),
            title: String::new(),
            description: String::new(),
            order: 1,
            is_published: true,
        }
    }
}

impl FormInput for ModuleForm {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModuleUpdate {
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    pub description: String,
}

impl FormInput for ModuleUpdate {}

// ── Content ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ContentForm {
    pub title: String,
    pub content_type: ContentType,
    pub text: String,
    #[validate(url(message = "Enter a valid URL."))]
    pub video_url: Option<String>,
    pub order: u32,
    pub is_required: bool,
    /// Minutes.
    pub duration: u32,
}

impl ContentForm {
    /// Field checks plus the per-type requirement: text needs a body, video
    /// a URL, file an upload.
    pub fn check_with_file(&self, has_file: bool) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        match self.content_type {
            ContentType::Text if self.text.trim().is_empty() => {
                errors.insert("text", "Text content is required.");
            }
            ContentType::Video if self.video_url.as_deref().map_or(true, str::is_empty) => {
                errors.insert("video_url", "A video URL is required.");
            }
            ContentType::File if !has_file => {
                errors.insert("file", "Choose a file to upload.");
            }
            _ => {}
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Empty values are left out, as the backend treats them as unset.
    pub fn multipart<F>(&self, module: &str, file: Option<F>) -> Multipart<F> {
        Multipart::new()
            .text("module", module)
            .text_if_set("title", &self.title)
            .text("content_type", self.content_type.as_str())
            .text_if_set("text", &self.text)
            .text_if_set("video_url", self.video_url.as_deref().unwrap_or_default())
            .file_if_set("file", file)
            .text("order", self.order)
            .text("is_required", self.is_required)
            .text("duration", self.duration)
    }
}

/// PATCH body for editing an existing content entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
}

// ── Assignments ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct SubmissionForm {
    pub comment: String,
}

impl SubmissionForm {
    pub fn multipart<F>(&self, file: Option<F>) -> Result<Multipart<F>, FieldErrors> {
        let Some(file) = file else {
            let mut errors = FieldErrors::new();
            errors.insert("submitted_file", "Choose a file to submit.");
            return Err(errors);
        };
        Ok(Multipart::new()
            .file("submitted_file", file)
            .text("comment", &self.comment))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct GradeForm {
    #[validate(custom(function = "decimal", message = "Enter a numeric grade."))]
    pub grade: String,
    pub feedback: String,
}

impl FormInput for GradeForm {}

impl GradeForm {
    pub fn multipart<F>(&self, corrected_file: Option<F>) -> Multipart<F> {
        Multipart::new()
            .text("grade", self.grade.trim())
            .text("feedback", &self.feedback)
            .file_if_set("corrected_file", corrected_file)
    }
}

// ── Feedback & applications ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FeedbackForm {
    #[validate(range(min = 1, max = 5, message = "Pick a rating from 1 to 5."))]
    pub rating: u8,
    pub comment: String,
}

impl FormInput for FeedbackForm {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TeacherApplicationForm {
    #[validate(length(min = 1, message = "Please fill in all required fields."))]
    pub highest_education: String,
    #[validate(length(min = 1, message = "Please fill in all required fields."))]
    pub skills: String,
    #[validate(length(min = 1, message = "Please fill in all required fields."))]
    pub expertise: String,
    #[validate(length(min = 1, message = "Please fill in all required fields."))]
    pub past_experience: String,
}

impl FormInput for TeacherApplicationForm {}

// ── Form state ──

/// Values, inline errors and the success banner of one form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState<T> {
    pub values: T,
    pub errors: FieldErrors,
    pub success: Option<String>,
    pub submitting: bool,
}

impl<T> FormState<T> {
    pub fn new(values: T) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
            success: None,
            submitting: false,
        }
    }

    pub fn begin(&mut self) {
        self.errors = FieldErrors::new();
        self.success = None;
        self.submitting = true;
    }

    pub fn fail(&mut self, errors: FieldErrors) {
        self.errors = errors;
        self.submitting = false;
    }

    pub fn fail_with(&mut self, err: ApiError, fallback: &str) {
        self.fail(err.into_field_errors(fallback));
    }

    /// Editing a field clears its error.
    pub fn touch(&mut self, field: &str) {
        self.errors.clear_field(field);
    }
}

impl<T: Default> FormState<T> {
    /// Back to defaults with only the banner left.
    pub fn succeed_and_reset(&mut self, message: &str) {
        *self = Self::new(T::default());
        self.success = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_form_defaults_to_beginner() {
        assert_eq!(CourseForm::default().level, Level::Beginner);
    }

    #[test]
    fn course_form_reports_fields() {
        let form = CourseForm {
            name: "Rust".into(),
            description: "d".into(),
            price: "abc".into(),
            duration: "ten".into(),
            ..Default::default()
        };
        let errors = form.to_request().unwrap_err();
        assert_eq!(errors.first("price"), Some("A valid number is required."));
        assert_eq!(errors.first("duration"), Some("A valid integer is required."));
        assert!(errors.first("name").is_none());
    }

    #[test]
    fn course_request_drops_blank_date() {
        let form = CourseForm {
            name: " Rust ".into(),
            description: "d".into(),
            price: "10".into(),
            duration: "4".into(),
            ..Default::default()
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.name, "Rust");
        assert_eq!(req.duration, 4);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("launch_date").is_none());
        assert_eq!(json["level"], "beginner");
    }

    #[test]
    fn signup_passwords_must_match() {
        let form = SignupForm {
            email: "a@b.io".into(),
            username: "a".into(),
            password: "longenough".into(),
            password2: "different".into(),
        };
        assert_eq!(
            form.check().unwrap_err().first("password2"),
            Some("Passwords do not match.")
        );
    }

    #[test]
    fn content_requirements_follow_type() {
        let mut form = ContentForm::default();
        assert!(form.check_with_file(false).unwrap_err().first("text").is_some());

        form.content_type = ContentType::File;
        assert!(form.check_with_file(false).unwrap_err().first("file").is_some());
        assert!(form.check_with_file(true).is_ok());

        form.content_type = ContentType::Video;
        form.video_url = Some("not a url".into());
        assert!(form.check_with_file(false).unwrap_err().first("video_url").is_some());
    }

    #[test]
    fn content_multipart_skips_blank_text() {
        let form = ContentForm {
            content_type: ContentType::File,
            ..Default::default()
        };
        let parts = form.multipart("intro", Some("notes.pdf"));
        assert_eq!(parts.get_text("module"), Some("intro"));
        assert_eq!(parts.get_text("text"), None);
        assert_eq!(parts.get_text("content_type"), Some("file"));
    }

    #[test]
    fn submission_requires_file() {
        let form = SubmissionForm::default();
        assert!(form.multipart::<&str>(None).is_err());
        assert!(form.multipart(Some("a.pdf")).is_ok());
    }

    #[test]
    fn feedback_rating_range() {
        assert!(FeedbackForm { rating: 0, comment: String::new() }.check().is_err());
        assert!(FeedbackForm { rating: 5, comment: String::new() }.check().is_ok());
    }

    #[test]
    fn form_state_reset_keeps_banner() {
        let mut state = FormState::new(CourseForm {
            name: "x".into(),
            level: Level::Advanced,
            ..Default::default()
        });
        state.begin();
        state.succeed_and_reset("Course created successfully!");
        assert_eq!(state.values, CourseForm::default());
        assert_eq!(state.success.as_deref(), Some("Course created successfully!"));
        assert!(!state.submitting);
    }

    #[test]
    fn touching_clears_field_error() {
        let mut state = FormState::new(LoginForm::default());
        state.fail(LoginForm::default().check().unwrap_err());
        assert!(state.errors.first("username").is_some());
        state.touch("username");
        assert!(state.errors.first("username").is_none());
    }
}
