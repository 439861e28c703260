use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::certificate::CertificateReview;
use crate::config::ClientConfig;
use crate::endpoints as ep;
use crate::error::ApiError;
use crate::forms::{
    ContentForm, ContentUpdate, CourseForm, CourseUpdate, FeedbackForm, FormInput, GradeForm,
    LoginForm, ModuleForm, ModuleUpdate, ProfileForm, SignupForm, SubmissionForm,
    TeacherApplicationForm,
};
use crate::http::{ApiRequest, Auth, Body, Method, Multipart, RawResponse, Transport};
use crate::models::{
    AdminCourse, AdminUser, Assignment, BanToggled, CompleteContent, Course, CourseProgress,
    Dashboard, Feedback, Message, Module, ModuleContent, ModuleItem, PendingCertificate,
    StatusChange, StudentInfo, Submission, TeacherApplication, TokenPair, User, UserFlags,
    VisibilityToggled,
};
use crate::moderation::ApplicationStatus;
use crate::search::SearchFilter;
use crate::session::{CredentialStore, Session};

/// Typed access to the learnhub backend. One method per operation.
pub struct ApiClient<T, S> {
    transport: T,
    session: Session<S>,
    config: Arc<ClientConfig>,
}

impl<T: Transport, S: CredentialStore> ApiClient<T, S> {
    pub fn new(transport: T, store: S, config: Arc<ClientConfig>) -> Self {
        let session = Session::new(store, &config);
        Self {
            transport,
            session,
            config,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ── Plumbing ──

    async fn execute(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Body<T::File>,
    ) -> Result<RawResponse, ApiError> {
        let bearer = match auth {
            Auth::None => None,
            Auth::Optional => self.session.access_token(),
            Auth::Required => match self.session.access_token() {
                Some(token) => Some(token),
                None => {
                    debug!(%method, path, "no stored token, request not sent");
                    return Err(ApiError::MissingCredentials);
                }
            },
        };

        debug!(%method, path, "request");
        let request = ApiRequest {
            method,
            url: self.config.url(path),
            bearer,
            body,
        };
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            warn!(status = response.status, %method, path, "request failed");
            Err(ApiError::from_status(response.status, &response.body))
        }
    }

    async fn json<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Body<T::File>,
    ) -> Result<R, ApiError> {
        let response = self.execute(method, path, auth, body).await?;
        serde_json::from_str(&response.body).map_err(|e| {
            warn!(path, error = %e, "response did not decode");
            ApiError::from(e)
        })
    }

    async fn unit(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Body<T::File>,
    ) -> Result<(), ApiError> {
        self.execute(method, path, auth, body).await.map(|_| ())
    }

    async fn get<R: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<R, ApiError> {
        self.json(Method::Get, path, auth, Body::Empty).await
    }

    fn body<B: Serialize>(payload: &B) -> Result<Body<T::File>, ApiError> {
        Ok(Body::Json(serde_json::to_string(payload)?))
    }

    fn form(form: Multipart<T::File>) -> Body<T::File> {
        Body::Multipart(form)
    }

    // ── Accounts ──

    /// Stores the access token and username on success.
    pub async fn login(&self, form: &LoginForm) -> Result<TokenPair, ApiError> {
        form.check().map_err(ApiError::Validation)?;
        let tokens: TokenPair = self
            .json(Method::Post, ep::LOGIN, Auth::None, Self::body(form)?)
            .await?;
        self.session.sign_in(&tokens, form.username.trim());
        Ok(tokens)
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<(), ApiError> {
        form.check().map_err(ApiError::Validation)?;
        self.unit(Method::Post, ep::SIGNUP, Auth::None, Self::body(form)?)
            .await
    }

    pub fn logout(&self) {
        self.session.sign_out();
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get(ep::ME, Auth::Required).await
    }

    pub async fn update_profile(
        &self,
        form: &ProfileForm,
        profile_image: Option<T::File>,
    ) -> Result<User, ApiError> {
        form.check().map_err(ApiError::Validation)?;
        self.json(
            Method::Patch,
            ep::ME_UPDATE,
            Auth::Required,
            Self::form(form.multipart(profile_image)),
        )
        .await
    }

    // ── Courses ──

    pub async fn courses(&self) -> Result<Vec<Course>, ApiError> {
        self.get(ep::COURSES, Auth::Optional).await
    }

    pub async fn search_courses(&self, filter: &SearchFilter) -> Result<Vec<Course>, ApiError> {
        let path = ep::courses_query(&filter.query_pairs());
        self.get(&path, Auth::Optional).await
    }

    pub async fn course(&self, slug: &str) -> Result<Course, ApiError> {
        self.get(&ep::course(slug), Auth::Optional).await
    }

    pub async fn create_course(&self, form: &CourseForm) -> Result<Course, ApiError> {
        let payload = form.to_request().map_err(ApiError::Validation)?;
        self.json(Method::Post, ep::COURSES, Auth::Required, Self::body(&payload)?)
            .await
    }

    pub async fn update_course(&self, slug: &str, update: &CourseUpdate) -> Result<Course, ApiError> {
        update.check().map_err(ApiError::Validation)?;
        self.json(Method::Patch, &ep::course(slug), Auth::Required, Self::body(update)?)
            .await
    }

    pub async fn delete_course(&self, slug: &str) -> Result<(), ApiError> {
        self.unit(Method::Delete, &ep::course(slug), Auth::Required, Body::Empty)
            .await
    }

    pub async fn enroll(&self, slug: &str) -> Result<Message, ApiError> {
        let empty = serde_json::json!({});
        let response = self
            .execute(
                Method::Post,
                &ep::course_enroll(slug),
                Auth::Required,
                Self::body(&empty)?,
            )
            .await?;
        // Older backends reply with an empty body.
        Ok(serde_json::from_str(&response.body).unwrap_or_default())
    }

    pub async fn course_progress(&self, slug: &str) -> Result<CourseProgress, ApiError> {
        self.get(&ep::course_progress(slug), Auth::Required).await
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        self.get(ep::DASHBOARD, Auth::Required).await
    }

    // ── Modules ──

    pub async fn create_module(&self, form: &ModuleForm) -> Result<Module, ApiError> {
        form.check().map_err(ApiError::Validation)?;
        self.json(Method::Post, ep::MODULES, Auth::Required, Self::body(form)?)
            .await
    }

    pub async fn module(&self, slug: &str) -> Result<Module, ApiError> {
        self.get(&ep::module(slug), Auth::Required).await
    }

    pub async fn update_module(&self, slug: &str, update: &ModuleUpdate) -> Result<Module, ApiError> {
        update.check().map_err(ApiError::Validation)?;
        self.json(Method::Put, &ep::module(slug), Auth::Required, Self::body(update)?)
            .await
    }

    pub async fn delete_module(&self, slug: &str) -> Result<(), ApiError> {
        self.unit(Method::Delete, &ep::module(slug), Auth::Required, Body::Empty)
            .await
    }

    /// Study material and assignments, mixed.
    pub async fn module_items(&self, slug: &str) -> Result<Vec<ModuleItem>, ApiError> {
        self.get(&ep::module_items(slug), Auth::Required).await
    }

    pub async fn module_assignments(&self, slug: &str) -> Result<Vec<Assignment>, ApiError> {
        self.get(&ep::module_assignments(slug), Auth::Required).await
    }

    // ── Content ──

    pub async fn create_content(
        &self,
        module_slug: &str,
        form: &ContentForm,
        file: Option<T::File>,
    ) -> Result<(), ApiError> {
        form.check_with_file(file.is_some())
            .map_err(ApiError::Validation)?;
        self.unit(
            Method::Post,
            ep::CONTENTS,
            Auth::Required,
            Self::form(form.multipart(module_slug, file)),
        )
        .await
    }

    pub async fn content(&self, id: i64) -> Result<ModuleContent, ApiError> {
        self.get(&ep::content(id), Auth::Required).await
    }

    pub async fn update_content(
        &self,
        id: i64,
        update: &ContentUpdate,
    ) -> Result<ModuleContent, ApiError> {
        self.json(Method::Patch, &ep::content(id), Auth::Required, Self::body(update)?)
            .await
    }

    pub async fn delete_content(&self, id: i64) -> Result<(), ApiError> {
        self.unit(Method::Delete, &ep::content(id), Auth::Required, Body::Empty)
            .await
    }

    pub async fn complete_content(&self, id: i64) -> Result<(), ApiError> {
        let payload = CompleteContent { content_id: id };
        self.unit(
            Method::Post,
            ep::CONTENT_COMPLETE,
            Auth::Required,
            Self::body(&payload)?,
        )
        .await
    }

    // ── Assignments ──

    pub async fn submissions(&self, assignment_id: i64) -> Result<Vec<Submission>, ApiError> {
        self.get(&ep::submissions(assignment_id), Auth::Required)
            .await
    }

    pub async fn submit_assignment(
        &self,
        assignment_id: i64,
        form: &SubmissionForm,
        file: Option<T::File>,
    ) -> Result<(), ApiError> {
        let parts = form.multipart(file).map_err(ApiError::Validation)?;
        self.unit(
            Method::Post,
            &ep::submit_assignment(assignment_id),
            Auth::Required,
            Self::form(parts),
        )
        .await
    }

    pub async fn grade_submission(
        &self,
        submission_id: i64,
        form: &GradeForm,
        corrected_file: Option<T::File>,
    ) -> Result<(), ApiError> {
        form.check().map_err(ApiError::Validation)?;
        self.unit(
            Method::Patch,
            &ep::grade_submission(submission_id),
            Auth::Required,
            Self::form(form.multipart(corrected_file)),
        )
        .await
    }

    // ── Certificates ──

    pub async fn apply_certificate(&self, slug: &str) -> Result<(), ApiError> {
        self.unit(
            Method::Post,
            &ep::certificate_apply(slug),
            Auth::Required,
            Body::Empty,
        )
        .await
    }

    pub async fn pending_certificates(&self) -> Result<Vec<PendingCertificate>, ApiError> {
        self.get(ep::PENDING_CERTIFICATES, Auth::Required).await
    }

    pub async fn review_certificate(
        &self,
        id: i64,
        review: CertificateReview,
    ) -> Result<(), ApiError> {
        let path = match review {
            CertificateReview::Approve => ep::certificate_approve(id),
            CertificateReview::Reject => ep::certificate_reject(id),
        };
        self.unit(Method::Post, &path, Auth::Required, Body::Empty)
            .await
    }

    // ── Feedback ──

    pub async fn feedback(&self, slug: &str) -> Result<Vec<Feedback>, ApiError> {
        self.get(&ep::feedback_list(slug), Auth::None).await
    }

    pub async fn submit_feedback(&self, slug: &str, form: &FeedbackForm) -> Result<(), ApiError> {
        form.check().map_err(ApiError::Validation)?;
        self.unit(
            Method::Post,
            &ep::feedback_submit(slug),
            Auth::Required,
            Self::body(form)?,
        )
        .await
    }

    // ── Admin ──

    pub async fn users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.get(ep::ADMIN_USERS, Auth::Required).await
    }

    /// The reply is the row as stored, which may ignore flags the caller
    /// is not allowed to set.
    pub async fn update_user_flags(
        &self,
        id: i64,
        flags: &UserFlags,
    ) -> Result<AdminUser, ApiError> {
        self.json(
            Method::Put,
            &ep::admin_user_update(id),
            Auth::Required,
            Self::body(flags)?,
        )
        .await
    }

    pub async fn students(&self) -> Result<Vec<StudentInfo>, ApiError> {
        self.get(ep::ADMIN_STUDENTS, Auth::Required).await
    }

    pub async fn toggle_ban(&self, id: i64) -> Result<BanToggled, ApiError> {
        self.json(
            Method::Patch,
            &ep::admin_ban_toggle(id),
            Auth::Required,
            Body::Empty,
        )
        .await
    }

    pub async fn admin_courses(&self) -> Result<Vec<AdminCourse>, ApiError> {
        self.get(ep::ADMIN_COURSES, Auth::Required).await
    }

    pub async fn toggle_visibility(&self, slug: &str) -> Result<VisibilityToggled, ApiError> {
        self.json(
            Method::Patch,
            &ep::admin_toggle_visibility(slug),
            Auth::Required,
            Body::Empty,
        )
        .await
    }

    pub async fn teacher_applications(&self) -> Result<Vec<TeacherApplication>, ApiError> {
        self.get(ep::TEACHER_APPLICATIONS, Auth::Required).await
    }

    pub async fn submit_teacher_application(
        &self,
        form: &TeacherApplicationForm,
    ) -> Result<(), ApiError> {
        form.check().map_err(ApiError::Validation)?;
        self.unit(
            Method::Post,
            ep::TEACHER_APPLICATION_SUBMIT,
            Auth::Required,
            Self::body(form)?,
        )
        .await
    }

    pub async fn set_application_status(
        &self,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        self.unit(
            Method::Patch,
            &ep::application_status(id),
            Auth::Required,
            Self::body(&StatusChange { status })?,
        )
        .await
    }
}
