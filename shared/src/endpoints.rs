//! Backend paths, relative to the configured base URL.

use urlencoding::encode;

pub const LOGIN: &str = "/api/accounts/login/";
pub const SIGNUP: &str = "/api/accounts/signup/";
pub const ME: &str = "/api/accounts/me/";
pub const ME_UPDATE: &str = "/api/accounts/me/update/";

pub const COURSES: &str = "/api/courses/courses/";
pub const DASHBOARD: &str = "/api/courses/dashboard/";
pub const MODULES: &str = "/api/courses/modules/";
pub const CONTENTS: &str = "/api/courses/contents/";
pub const CONTENT_COMPLETE: &str = "/api/courses/content-progress/complete/";
pub const PENDING_CERTIFICATES: &str = "/api/courses/certificates/pending/";

pub const ADMIN_USERS: &str = "/api/admin/";
pub const ADMIN_STUDENTS: &str = "/api/admin/students/";
pub const ADMIN_COURSES: &str = "/api/admin/courses/";
pub const TEACHER_APPLICATIONS: &str = "/api/admin/teacher-application/";
pub const TEACHER_APPLICATION_SUBMIT: &str = "/api/admin/teacher-application/submit/";

/// `COURSES` plus an encoded query string; no `?` when there are no pairs.
pub fn courses_query(pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return COURSES.to_string();
    }
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{COURSES}?{query}")
}

pub fn course(slug: &str) -> String {
    format!("{COURSES}{}/", encode(slug))
}

pub fn course_enroll(slug: &str) -> String {
    format!("{COURSES}{}/enroll/", encode(slug))
}

pub fn course_progress(slug: &str) -> String {
    format!("{COURSES}{}/progress/", encode(slug))
}

pub fn module(slug: &str) -> String {
    format!("{MODULES}{}/", encode(slug))
}

pub fn module_items(slug: &str) -> String {
    format!("{CONTENTS}?module_slug={}", encode(slug))
}

pub fn module_assignments(slug: &str) -> String {
    format!("{MODULES}{}/assignments/", encode(slug))
}

pub fn content(id: i64) -> String {
    format!("{CONTENTS}{id}/")
}

pub fn submissions(assignment_id: i64) -> String {
    format!("/api/courses/assignments/{assignment_id}/submissions/")
}

pub fn submit_assignment(assignment_id: i64) -> String {
    format!("/api/courses/assignments/{assignment_id}/submit/")
}

pub fn grade_submission(submission_id: i64) -> String {
    format!("/api/courses/submissions/{submission_id}/grade/")
}

pub fn certificate_apply(slug: &str) -> String {
    format!("/api/courses/certificates/apply/{}/", encode(slug))
}

pub fn certificate_approve(id: i64) -> String {
    format!("/api/courses/certificates/approve/{id}/")
}

pub fn certificate_reject(id: i64) -> String {
    format!("/api/courses/certificates/reject/{id}/")
}

pub fn feedback_list(slug: &str) -> String {
    format!("/api/courses/{}/feedback/list/", encode(slug))
}

pub fn feedback_submit(slug: &str) -> String {
    format!("/api/courses/{}/feedback/", encode(slug))
}

pub fn admin_user_update(id: i64) -> String {
    format!("/api/admin/users/{id}/update/")
}

pub fn admin_ban_toggle(id: i64) -> String {
    format!("/api/admin/students/{id}/ban-toggle/")
}

pub fn admin_toggle_visibility(slug: &str) -> String {
    format!("/api/admin/courses/{}/toggle-visibility/", encode(slug))
}

pub fn application_status(id: i64) -> String {
    format!("/api/admin/teacher-application/{id}/status/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_encoded() {
        assert_eq!(course("rust 101"), "/api/courses/courses/rust%20101/");
        assert_eq!(module_items("intro-1"), "/api/courses/contents/?module_slug=intro-1");
    }

    #[test]
    fn query_pairs() {
        assert_eq!(courses_query(&[]), COURSES);
        assert_eq!(
            courses_query(&[("search", "web dev".into()), ("ordering", "-price".into())]),
            "/api/courses/courses/?search=web%20dev&ordering=-price"
        );
    }

    #[test]
    fn id_paths() {
        assert_eq!(content(7), "/api/courses/contents/7/");
        assert_eq!(certificate_reject(2), "/api/courses/certificates/reject/2/");
        assert_eq!(application_status(5), "/api/admin/teacher-application/5/status/");
        assert_eq!(admin_toggle_visibility("go"), "/api/admin/courses/go/toggle-visibility/");
    }
}
