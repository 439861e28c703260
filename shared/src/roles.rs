use crate::models::Course;

/// How the current viewer relates to a course. Drives which controls the
/// course page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseRole {
    Author,
    Learner,
    Visitor,
    Anonymous,
}

impl CourseRole {
    pub fn of(course: &Course, signed_in: bool) -> Self {
        match (signed_in, course.is_author, course.is_enrolled) {
            (false, _, _) => Self::Anonymous,
            (true, true, _) => Self::Author,
            (true, false, true) => Self::Learner,
            (true, false, false) => Self::Visitor,
        }
    }

    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Author)
    }

    pub const fn can_enroll(self) -> bool {
        matches!(self, Self::Visitor)
    }

    pub const fn tracks_progress(self) -> bool {
        matches!(self, Self::Learner)
    }

    pub const fn can_review(self) -> bool {
        matches!(self, Self::Learner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_resolution() {
        let mut course = Course::default();
        assert_eq!(CourseRole::of(&course, false), CourseRole::Anonymous);
        assert_eq!(CourseRole::of(&course, true), CourseRole::Visitor);

        course.is_enrolled = true;
        assert_eq!(CourseRole::of(&course, true), CourseRole::Learner);

        course.is_author = true;
        let role = CourseRole::of(&course, true);
        assert_eq!(role, CourseRole::Author);
        assert!(role.can_edit());
        assert!(!role.can_enroll());
    }
}
