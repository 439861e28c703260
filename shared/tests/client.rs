use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use learnhub_shared::certificate::{CertificateEvent, CertificatePanel, CertificateStatus};
use learnhub_shared::debounce::Debouncer;
use learnhub_shared::forms::{ContentUpdate, CourseForm, FormState, LoginForm};
use learnhub_shared::http::{ApiRequest, Body, Method, RawResponse, Transport};
use learnhub_shared::models::{AdminUser, Level, StudentInfo, UserFlags};
use learnhub_shared::optimistic::{flip_where, optimistic, replace_where};
use learnhub_shared::search::SearchFilter;
use learnhub_shared::session::{CredentialStore, MemoryStore};
use learnhub_shared::{ApiClient, ApiError, ClientConfig, LoadState};

/// Replies from a script and records every request it was handed.
#[derive(Clone, Default)]
struct Scripted {
    replies: Arc<Mutex<VecDeque<RawResponse>>>,
    sent: Arc<Mutex<Vec<ApiRequest<String>>>>,
}

impl Scripted {
    fn reply(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push_back(RawResponse {
            status,
            body: body.to_string(),
        });
        self
    }

    fn sent(&self) -> Vec<ApiRequest<String>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for Scripted {
    type File = String;

    async fn send(&self, request: ApiRequest<String>) -> Result<RawResponse, ApiError> {
        self.sent.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Network("script exhausted".into()))
    }
}

fn client(transport: Scripted, store: MemoryStore) -> ApiClient<Scripted, MemoryStore> {
    ApiClient::new(transport, store, Arc::new(ClientConfig::default()))
}

fn signed_in() -> MemoryStore {
    let store = MemoryStore::new();
    store.store("access", "tok");
    store.store("username", "ada");
    store
}

#[tokio::test]
async fn gated_call_without_token_sends_nothing() {
    let transport = Scripted::default();
    let api = client(transport.clone(), MemoryStore::new());

    let result = api.dashboard().await;
    assert_eq!(result, Err(ApiError::MissingCredentials));
    assert!(transport.sent().is_empty());

    let state = LoadState::from_item(result, "Failed to load dashboard.");
    assert_eq!(state, LoadState::Unauthorized);
}

#[tokio::test]
async fn bearer_attached_when_signed_in() {
    let transport = Scripted::default().reply(200, r#"{"id": 1, "username": "ada"}"#);
    let api = client(transport.clone(), signed_in());

    let me = api.me().await.unwrap();
    assert_eq!(me.username, "ada");

    let sent = transport.sent();
    assert_eq!(sent[0].method, Method::Get);
    assert_eq!(sent[0].url, "http://127.0.0.1:8000/api/accounts/me/");
    assert_eq!(sent[0].bearer.as_deref(), Some("tok"));
}

#[tokio::test]
async fn empty_course_list_renders_empty() {
    let transport = Scripted::default().reply(200, "[]");
    let api = client(transport.clone(), MemoryStore::new());

    let state = LoadState::from_list(api.courses().await, "Failed to load courses.");
    assert_eq!(state, LoadState::Empty);
    // public listing goes out without a token
    assert_eq!(transport.sent()[0].bearer, None);
}

#[tokio::test]
async fn login_persists_access_and_username() {
    let transport = Scripted::default().reply(200, r#"{"access": "A1", "refresh": "R1"}"#);
    let store = MemoryStore::new();
    let api = client(transport.clone(), store.clone());

    let form = LoginForm {
        username: "ada".into(),
        password: "secret".into(),
    };
    api.login(&form).await.unwrap();

    assert_eq!(store.load("access").as_deref(), Some("A1"));
    assert_eq!(store.load("username").as_deref(), Some("ada"));
    assert!(store.load("refresh").is_none());
    assert_eq!(transport.sent()[0].bearer, None);
    assert!(matches!(&transport.sent()[0].body, Body::Json(b) if b.contains("\"username\":\"ada\"")));
}

#[tokio::test]
async fn invalid_form_is_rejected_locally() {
    let transport = Scripted::default();
    let api = client(transport.clone(), signed_in());

    let err = api.create_course(&CourseForm::default()).await.unwrap_err();
    assert!(err.field_errors().and_then(|e| e.first("name")).is_some());
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn server_field_errors_reach_the_form() {
    let transport = Scripted::default().reply(400, r#"{"price": ["Ensure this value is less than 100000."]}"#);
    let api = client(transport, signed_in());

    let form = CourseForm {
        name: "Rust".into(),
        description: "Systems".into(),
        price: "999999".into(),
        duration: "3".into(),
        ..Default::default()
    };
    let mut state = FormState::new(form.clone());
    state.begin();
    let err = api.create_course(&form).await.unwrap_err();
    state.fail_with(err, "An error occurred. Please try again.");

    assert_eq!(
        state.errors.first("price"),
        Some("Ensure this value is less than 100000.")
    );
    assert_eq!(state.values, form);
}

#[tokio::test]
async fn created_course_resets_form() {
    let transport = Scripted::default().reply(201, r#"{"slug": "rust-1a2b3c", "name": "Rust", "price": "10.00"}"#);
    let api = client(transport.clone(), signed_in());

    let mut state = FormState::new(CourseForm {
        name: "Rust".into(),
        description: "Systems".into(),
        price: "10".into(),
        duration: "3".into(),
        level: Level::Advanced,
        ..Default::default()
    });
    state.begin();
    let created = api.create_course(&state.values).await.unwrap();
    assert_eq!(created.slug, "rust-1a2b3c");
    state.succeed_and_reset("Course created successfully!");

    assert_eq!(state.values, CourseForm::default());
    assert_eq!(state.values.level, Level::Beginner);
    assert!(state.errors.is_empty());
    assert_eq!(transport.sent()[0].url, "http://127.0.0.1:8000/api/courses/courses/");
}

#[tokio::test]
async fn failed_ban_toggle_rolls_back() {
    let transport = Scripted::default().reply(500, r#"{"detail": "boom"}"#);
    let api = client(transport.clone(), signed_in());

    let rows = RefCell::new(vec![
        StudentInfo { id: 1, username: "a".into(), ..Default::default() },
        StudentInfo { id: 2, username: "b".into(), ..Default::default() },
    ]);

    let result = optimistic(
        &rows,
        |rows: &mut Vec<StudentInfo>| flip_where(rows, |s| s.id == 2, |s| &mut s.is_banned),
        |rows: &mut Vec<StudentInfo>, old| {
            replace_where(rows, |s| s.id == 2, |s| &mut s.is_banned, old);
        },
        || api.toggle_ban(2),
    )
    .await;

    assert!(result.is_err());
    assert!(rows.borrow().iter().all(|s| !s.is_banned));
    assert_eq!(transport.sent()[0].method, Method::Patch);
    assert!(transport.sent()[0].url.ends_with("/api/admin/students/2/ban-toggle/"));
}

#[tokio::test]
async fn refused_ban_shows_server_reason() {
    let transport = Scripted::default().reply(403, r#"{"detail": "Cannot ban an admin user."}"#);
    let api = client(transport, signed_in());

    let rows = RefCell::new(vec![StudentInfo { id: 1, username: "root".into(), ..Default::default() }]);
    let err = optimistic(
        &rows,
        |rows: &mut Vec<StudentInfo>| flip_where(rows, |s| s.id == 1, |s| &mut s.is_banned),
        |rows: &mut Vec<StudentInfo>, old| {
            replace_where(rows, |s| s.id == 1, |s| &mut s.is_banned, old);
        },
        || api.toggle_ban(1),
    )
    .await
    .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.message_or("Failed to update ban status."), "Cannot ban an admin user.");
    assert!(!rows.borrow()[0].is_banned);
}

#[tokio::test]
async fn user_flags_reply_overrides_local_flip() {
    // the server ignores is_semi_admin for non-superusers and returns the stored row
    let transport = Scripted::default().reply(
        200,
        r#"{"id": 3, "username": "bo", "is_semi_admin": false, "is_banned": false}"#,
    );
    let api = client(transport.clone(), signed_in());

    let mut rows = vec![AdminUser { id: 3, username: "bo".into(), ..Default::default() }];
    flip_where(&mut rows, |u| u.id == 3, |u| &mut u.is_semi_admin);
    assert!(rows[0].is_semi_admin);

    let flags = UserFlags { is_semi_admin: Some(true), ..Default::default() };
    let stored = api.update_user_flags(3, &flags).await.unwrap();
    replace_where(&mut rows, |u| u.id == stored.id, |u| &mut u.is_semi_admin, stored.is_semi_admin);

    assert!(!rows[0].is_semi_admin);
    let sent = transport.sent();
    assert_eq!(sent[0].method, Method::Put);
    assert!(sent[0].url.ends_with("/api/admin/users/3/update/"));
    assert!(matches!(&sent[0].body, Body::Json(b) if b == r#"{"is_semi_admin":true}"#));
}

#[tokio::test]
async fn content_and_module_edits_hit_their_paths() {
    let transport = Scripted::default()
        .reply(200, r#"{"id": 7, "content_type": "text", "title": "Ownership"}"#)
        .reply(204, "")
        .reply(204, "");
    let api = client(transport.clone(), signed_in());

    let update = ContentUpdate { title: Some("Ownership".into()), ..Default::default() };
    let content = api.update_content(7, &update).await.unwrap();
    assert_eq!(content.title.as_deref(), Some("Ownership"));
    api.delete_content(7).await.unwrap();
    api.delete_module("intro").await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].method, Method::Patch);
    assert_eq!(sent[0].url, "http://127.0.0.1:8000/api/courses/contents/7/");
    assert!(matches!(&sent[0].body, Body::Json(b) if b == r#"{"title":"Ownership"}"#));
    assert_eq!(sent[1].method, Method::Delete);
    assert_eq!(sent[1].url, "http://127.0.0.1:8000/api/courses/contents/7/");
    assert_eq!(sent[2].method, Method::Delete);
    assert_eq!(sent[2].url, "http://127.0.0.1:8000/api/courses/modules/intro/");
}

#[tokio::test]
async fn unreadable_reply_stays_a_network_error() {
    // no scripted reply: the transport fails the way a dropped body read does
    let api = client(Scripted::default(), signed_in());

    let err = api.me().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(
        LoadState::from_item(Err::<(), _>(err), "Failed to load profile."),
        LoadState::Failed("Failed to load profile.".into())
    );
}

#[tokio::test]
async fn certificate_control_follows_progress() {
    let transport = Scripted::default()
        .reply(200, r#"{"progress": 100, "certificate_status": "not_applied"}"#)
        .reply(201, "")
        .reply(200, r#"{"progress_percent": 100, "certificate_status": "pending"}"#);
    let api = client(transport.clone(), signed_in());

    let progress = api.course_progress("rust").await.unwrap();
    let panel = CertificatePanel::resolve(true, progress.progress, progress.certificate_status, None);
    assert!(panel.shows_apply());

    api.apply_certificate("rust").await.unwrap();
    let local = progress
        .certificate_status
        .apply(CertificateEvent::Apply { progress: progress.progress })
        .unwrap();
    assert_eq!(local, CertificateStatus::Pending);

    let refreshed = api.course_progress("rust").await.unwrap();
    assert_eq!(refreshed.certificate_status, local);
    assert_eq!(
        CertificatePanel::resolve(true, refreshed.progress, refreshed.certificate_status, None),
        CertificatePanel::Pending
    );
}

#[tokio::test]
async fn stale_search_response_is_dropped() {
    let transport = Scripted::default()
        .reply(200, r#"[{"slug": "old", "name": "Old"}]"#)
        .reply(200, r#"[{"slug": "new", "name": "New"}]"#);
    let api = client(transport.clone(), MemoryStore::new());
    let debouncer = Debouncer::new(Duration::from_millis(500));
    let mut shown: LoadState<Vec<String>> = LoadState::Loading;

    let first = debouncer.schedule();
    let first_filter = SearchFilter { search: "ru".into(), ..Default::default() };
    let second = debouncer.schedule();
    let second_filter = SearchFilter { search: "rust".into(), ..Default::default() };

    // the first timer fires late but its ticket was superseded
    assert!(!debouncer.is_current(first));
    let late = api.search_courses(&first_filter).await;
    if debouncer.is_current(first) {
        shown = LoadState::from_list(late, "Failed to load courses.").map(slugs);
    }
    assert!(shown.is_loading());

    let fresh = api.search_courses(&second_filter).await;
    if debouncer.is_current(second) {
        shown = LoadState::from_list(fresh, "Failed to load courses.").map(slugs);
    }
    assert_eq!(shown, LoadState::Ready(vec!["new".to_string()]));
    assert!(transport.sent()[1].url.ends_with("?search=rust"));
}

fn slugs(courses: Vec<learnhub_shared::models::Course>) -> Vec<String> {
    courses.into_iter().map(|c| c.slug).collect()
}
