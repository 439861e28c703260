use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::certificate::CertificateStatus;
use crate::moderation::ApplicationStatus;

// ── Serde helpers ──

/// Treat `null` like a missing key.
fn null_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Accepts RFC 3339 and naive ISO timestamps; anything unparsable is `None`.
fn lenient_datetime<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn lenient_date<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()))
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|n| n.and_utc())
        })
}

/// Decimal amount. The backend sends `"499.00"`; older endpoints send a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    pub fn new(amount: impl Into<String>) -> Self {
        Self(amount.into())
    }

    pub fn amount(&self) -> f64 {
        self.0.trim().parse().unwrap_or(0.0)
    }

    pub fn is_free(&self) -> bool {
        self.amount() == 0.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Option::<Raw>::deserialize(de)? {
            Some(Raw::Text(s)) => Self(s),
            Some(Raw::Number(n)) => Self(n.to_string()),
            None => Self::default(),
        })
    }
}

// ── Auth ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: String,
}

/// Generic `{"message": ...}` / `{"error": ...}` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub bio: String,
    #[serde(default)]
    pub is_teacher: bool,
    #[serde(default)]
    pub is_semi_admin: bool,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub banner_image: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub joined_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name, &self.username)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub username: String,
    #[serde(default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub bio: String,
}

impl Author {
    pub fn display_name(&self) -> String {
        join_name(&self.first_name, &self.last_name, &self.username)
    }
}

fn join_name(first: &str, last: &str, fallback: &str) -> String {
    let joined = format!("{} {}", first.trim(), last.trim());
    let joined = joined.trim();
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined.to_string()
    }
}

// ── Courses ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub slug: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub rating: f32,
    #[serde(default)]
    pub price: Price,
    #[serde(default, deserialize_with = "lenient_date")]
    pub launch_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub level: Level,
    /// Hours.
    #[serde(default, deserialize_with = "null_default")]
    pub duration: u32,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub is_enrolled: bool,
    #[serde(default)]
    pub is_author: bool,
    #[serde(default, alias = "progress_percent")]
    pub progress: Option<u8>,
    #[serde(default, deserialize_with = "null_default")]
    pub certificate_status: CertificateStatus,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

const fn visible_by_default() -> bool {
    true
}

impl Course {
    /// Nested author when present, flat `author_name` otherwise.
    pub fn instructor(&self) -> String {
        self.author
            .as_ref()
            .map(Author::display_name)
            .or_else(|| self.author_name.clone())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    #[serde(default, alias = "progress_percent")]
    pub progress: u8,
    #[serde(default, deserialize_with = "null_default")]
    pub certificate_status: CertificateStatus,
    #[serde(default)]
    pub certificate_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolledCourse {
    pub slug: String,
    pub name: String,
    #[serde(default, alias = "progress_percent")]
    pub progress: u8,
    #[serde(default, deserialize_with = "null_default")]
    pub certificate_status: CertificateStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default, deserialize_with = "null_default")]
    pub enrolled_courses: Vec<EnrolledCourse>,
    #[serde(default, deserialize_with = "null_default")]
    pub authored_courses: Vec<Course>,
}

// ── Modules & content ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub slug: String,
    #[serde(default)]
    pub course: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub contents: Vec<ModuleContent>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Video,
    File,
}

impl ContentType {
    pub const ALL: [Self; 3] = [Self::Text, Self::Video, Self::File];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Video => "video",
            Self::File => "file",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Article",
            Self::Video => "Video Lecture",
            Self::File => "Document",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleContent {
    pub id: i64,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub content_type: ContentType,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    /// Minutes.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_completed: bool,
}

/// One entry of a module listing. Study material has a `content_type`;
/// graded work does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleItem {
    Content(ModuleContent),
    Assignment(Assignment),
}

/// Split a listing into (study material, graded work), keeping order.
pub fn partition_items(items: Vec<ModuleItem>) -> (Vec<ModuleContent>, Vec<Assignment>) {
    let mut study = Vec::new();
    let mut graded = Vec::new();
    for item in items {
        match item {
            ModuleItem::Content(c) => study.push(c),
            ModuleItem::Assignment(a) => graded.push(a),
        }
    }
    (study, graded)
}

// ── Assignments ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, alias = "attachment")]
    pub question_pdf: Option<String>,
    #[serde(default)]
    pub is_author: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub student_name: String,
    #[serde(default, alias = "submitted_files")]
    pub submitted_file: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub grade: Option<Price>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub corrected_file: Option<String>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub const fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

/// (ungraded, graded)
pub fn split_by_grade(submissions: Vec<Submission>) -> (Vec<Submission>, Vec<Submission>) {
    submissions.into_iter().partition(|s| !s.is_graded())
}

/// The viewer's own entry in a submissions listing.
pub fn own_submission(submissions: &[Submission]) -> Option<&Submission> {
    submissions.iter().find(|s| s.is_owner)
}

// ── Certificates ──

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingCertificate {
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub student_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub student_email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub course_title: String,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub status: CertificateStatus,
}

// ── Feedback ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    /// Username of the reviewer.
    pub user: String,
    pub rating: u8,
    #[serde(default, deserialize_with = "null_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// The signed-in user's existing review, matched by stored username.
pub fn own_feedback<'a>(feedback: &'a [Feedback], username: Option<&str>) -> Option<&'a Feedback> {
    let username = username?;
    feedback.iter().find(|f| f.user == username)
}

// ── Admin ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default)]
    pub is_teacher: bool,
    #[serde(default)]
    pub is_semi_admin: bool,
    #[serde(default)]
    pub is_banned: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub id: i64,
    pub username: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub enrolled_courses: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub certificates_earned: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCourse {
    pub slug: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub author_name: String,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanToggled {
    pub id: i64,
    pub is_banned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityToggled {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub is_visible: bool,
}

/// Partial flag update for `PUT /api/admin/users/{id}/update/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_banned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_semi_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_teacher: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherApplication {
    pub id: i64,
    /// String form of the applicant.
    #[serde(default, deserialize_with = "null_default")]
    pub user: String,
    #[serde(default, deserialize_with = "null_default")]
    pub highest_education: String,
    #[serde(default, deserialize_with = "null_default")]
    pub skills: String,
    #[serde(default, deserialize_with = "null_default")]
    pub expertise: String,
    #[serde(default, deserialize_with = "null_default")]
    pub past_experience: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteContent {
    pub content_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_detail_decodes() {
        let json = r#"{
            "slug": "rust-101-a1b2c3",
            "name": "Rust 101",
            "description": null,
            "created_at": "2025-01-05T10:00:00.123456Z",
            "rating": 4,
            "price": "499.00",
            "launch_date": "2025-02-01",
            "is_published": true,
            "thumbnail": null,
            "level": "intermediate",
            "duration": 12,
            "author": {"id": 3, "username": "grace", "first_name": "Grace", "last_name": "Hopper", "email": "g@x.io", "bio": ""},
            "modules": [{"slug": "intro-ff00aa", "title": "Intro", "order": 1, "contents": [
                {"id": 9, "content_type": "video", "video_url": "https://v/1", "duration": 7, "order": 0, "is_required": true}
            ]}],
            "is_enrolled": true,
            "progress_percent": 40
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.price.amount(), 499.0);
        assert_eq!(course.level, Level::Intermediate);
        assert_eq!(course.description, "");
        assert_eq!(course.progress, Some(40));
        assert_eq!(course.instructor(), "Grace Hopper");
        assert_eq!(course.certificate_status, CertificateStatus::NotApplied);
        assert!(course.is_visible);
        assert_eq!(course.modules[0].contents[0].content_type, ContentType::Video);
        assert!(course.created_at.is_some());
    }

    #[test]
    fn search_listing_uses_flat_author() {
        let course: Course =
            serde_json::from_str(r#"{"slug": "s", "name": "N", "price": 0, "author_name": "bob"}"#)
                .unwrap();
        assert!(course.price.is_free());
        assert_eq!(course.instructor(), "bob");
    }

    #[test]
    fn module_items_split_by_shape() {
        let json = r#"[
            {"id": 1, "title": "Reading", "content_type": "text", "text": "..."},
            {"id": 2, "title": "Homework", "description": "Do it", "deadline": "2025-03-01T00:00:00Z"},
            {"id": 3, "content_type": "file", "file": "/media/a.pdf", "is_completed": true}
        ]"#;
        let items: Vec<ModuleItem> = serde_json::from_str(json).unwrap();
        let (study, graded) = partition_items(items);
        assert_eq!(study.iter().map(|c| c.id).collect::<Vec<_>>(), [1, 3]);
        assert_eq!(graded.len(), 1);
        assert_eq!(graded[0].title, "Homework");
        assert!(study[1].is_completed);
    }

    #[test]
    fn naive_timestamps_are_accepted() {
        assert!(parse_timestamp("2025-03-01T08:30:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn submissions_split_on_grade() {
        let subs: Vec<Submission> = serde_json::from_str(
            r#"[{"id": 1, "student_name": "a", "grade": null},
                {"id": 2, "student_name": "b", "grade": "8.50", "feedback": "good"}]"#,
        )
        .unwrap();
        let (ungraded, graded) = split_by_grade(subs);
        assert_eq!(ungraded[0].id, 1);
        assert_eq!(graded[0].grade.as_ref().map(Price::as_str), Some("8.50"));
    }

    #[test]
    fn own_submission_is_flagged() {
        let subs = vec![
            Submission { id: 1, ..Default::default() },
            Submission { id: 2, is_owner: true, ..Default::default() },
        ];
        assert_eq!(own_submission(&subs).map(|s| s.id), Some(2));
        assert!(own_submission(&subs[..1]).is_none());
    }

    #[test]
    fn own_feedback_matches_username() {
        let list = vec![
            Feedback { id: 1, user: "ann".into(), rating: 5, ..Default::default() },
            Feedback { id: 2, user: "ben".into(), rating: 2, ..Default::default() },
        ];
        assert_eq!(own_feedback(&list, Some("ben")).map(|f| f.id), Some(2));
        assert!(own_feedback(&list, None).is_none());
    }

    #[test]
    fn user_flags_serialize_only_set_fields() {
        let flags = UserFlags { is_banned: Some(true), ..Default::default() };
        assert_eq!(serde_json::to_string(&flags).unwrap(), r#"{"is_banned":true}"#);
    }

    #[test]
    fn full_name_falls_back_to_username() {
        let user = User { username: "ada".into(), ..Default::default() };
        assert_eq!(user.full_name(), "ada");
    }
}
