use std::future::Future;

use leptos::prelude::*;
use learnhub_shared::format;
use learnhub_shared::models::{AdminCourse, AdminUser, StudentInfo, TeacherApplication, UserFlags};
use learnhub_shared::moderation::{AdminTab, ApplicationStatus, InFlight};
use learnhub_shared::optimistic::{flip_where, optimistic, replace_where};
use learnhub_shared::{ApiError, LoadState};
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, SignalStore};
use crate::widgets::{load_view, StatusBadge, Texts};

const USERS: Texts = Texts::new("Loading users...", "No users found.").denied(DENIED);
const STUDENTS: Texts = Texts::new("Loading students...", "No students found.").denied(DENIED);
const COURSES: Texts = Texts::new("Loading courses...", "No courses found.").denied(DENIED);
const APPLICATIONS: Texts =
    Texts::new("Loading applications...", "No teacher applications.").denied(DENIED);
const DENIED: &str = "You do not have permission to view the admin panel.";

#[component]
pub fn AdminPanel() -> impl IntoView {
    let tab = RwSignal::new(AdminTab::default());

    view! {
        <section class="learnhub-admin">
            <h2>"Admin Panel"</h2>
            <nav class="learnhub-tabs">
                {AdminTab::ALL.into_iter().map(|t| view! {
                    <button
                        class="learnhub-tab"
                        class:active=move || tab.get() == t
                        on:click=move |_| tab.set(t)
                    >
                        {t.label()}
                    </button>
                }).collect_view()}
            </nav>
            {move || match tab.get() {
                AdminTab::Users => view! { <UsersTab /> }.into_any(),
                AdminTab::TeacherApplications => view! { <ApplicationsTab /> }.into_any(),
                AdminTab::Students => view! { <StudentsTab /> }.into_any(),
                AdminTab::Courses => view! { <CoursesTab /> }.into_any(),
            }}
        </section>
    }
}

// ── Table state ──

/// Rows of one tab, the row whose request is running, and the last failure
/// with the row it belongs to.
struct Table<Row: Send + Sync + 'static, K: Send + Sync + 'static> {
    rows: RwSignal<LoadState<Vec<Row>>>,
    busy: RwSignal<InFlight<K>>,
    failed: RwSignal<Option<(K, String)>>,
    error: RwSignal<Option<String>>,
}

impl<Row: Send + Sync + 'static, K: Send + Sync + 'static> Clone for Table<Row, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Row: Send + Sync + 'static, K: Send + Sync + 'static> Copy for Table<Row, K> {}

impl<Row, K> Table<Row, K>
where
    Row: Send + Sync + 'static,
    K: Clone + PartialEq + Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            rows: RwSignal::new(LoadState::Loading),
            busy: RwSignal::new(InFlight::default()),
            failed: RwSignal::new(None),
            error: RwSignal::new(None),
        }
    }

    fn load<Fut>(self, fetch: impl FnOnce() -> Fut + 'static, failure: &'static str)
    where
        Fut: Future<Output = Result<Vec<Row>, ApiError>> + 'static,
    {
        spawn_local(async move {
            self.rows.set(LoadState::from_list(fetch().await, failure));
        });
    }

    fn is_busy(self, key: &K) -> bool {
        self.busy.with(|b| b.is_busy(key))
    }

    fn row_error(self, key: &K) -> Option<String> {
        self.failed.with(|f| match f {
            Some((k, message)) if k == key => Some(message.clone()),
            _ => None,
        })
    }

    /// Patch the row locally, send the request, and roll the patch back if
    /// it fails. `settle` reconciles the row with the server reply.
    fn patch<P, R, Fut>(
        self,
        key: K,
        apply: impl FnOnce(&mut Vec<Row>) -> Option<P> + 'static,
        compensate: impl FnOnce(&mut Vec<Row>, P) + 'static,
        request: impl FnOnce() -> Fut + 'static,
        settle: impl FnOnce(&mut Vec<Row>, R) + 'static,
        failure: &'static str,
    ) where
        P: 'static,
        R: 'static,
        Fut: Future<Output = Result<R, ApiError>> + 'static,
    {
        if !self.busy.try_update(|b| b.begin(key.clone())).unwrap_or(false) {
            return;
        }
        self.error.set(None);
        self.failed.set(None);
        spawn_local(async move {
            let store = SignalStore(self.rows);
            let result = optimistic(
                &store,
                |state: &mut LoadState<Vec<Row>>| state.ready_mut().and_then(apply),
                |state: &mut LoadState<Vec<Row>>, undo| {
                    if let Some(rows) = state.ready_mut() {
                        compensate(rows, undo);
                    }
                },
                request,
            )
            .await;
            match result {
                Ok(reply) => self.rows.update(|state| {
                    if let Some(rows) = state.ready_mut() {
                        settle(rows, reply);
                    }
                }),
                Err(err) => {
                    // a refused action carries the backend's reason
                    self.failed.set(Some((key, err.message_or("Update failed."))));
                    self.error.set(Some(err.message_or(failure)));
                }
            }
            self.busy.update(|b| b.finish());
        });
    }

    fn error_banner(self) -> impl IntoView {
        move || self.error.get().map(|m| view! { <p class="learnhub-error">{m}</p> })
    }
}

// ── Users ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserFlag {
    Banned,
    SemiAdmin,
}

impl UserFlag {
    fn field(self, user: &mut AdminUser) -> &mut bool {
        match self {
            Self::Banned => &mut user.is_banned,
            Self::SemiAdmin => &mut user.is_semi_admin,
        }
    }

    fn update(self, value: bool) -> UserFlags {
        match self {
            Self::Banned => UserFlags {
                is_banned: Some(value),
                ..UserFlags::default()
            },
            Self::SemiAdmin => UserFlags {
                is_semi_admin: Some(value),
                ..UserFlags::default()
            },
        }
    }
}

#[component]
fn UsersTab() -> impl IntoView {
    let table: Table<AdminUser, i64> = Table::new();
    table.load(|| async { api::client().users().await }, "Failed to load users.");

    let toggle = move |id: i64, flag: UserFlag, value: bool| {
        let flags = flag.update(value);
        table.patch(
            id,
            move |rows| replace_where(rows, |u| u.id == id, |u| flag.field(u), value),
            move |rows, old| {
                replace_where(rows, |u| u.id == id, |u| flag.field(u), old);
            },
            move || async move { api::client().update_user_flags(id, &flags).await },
            |rows, stored: AdminUser| {
                let id = stored.id;
                replace_where(rows, |u| u.id == id, |u| u, stored);
            },
            "Failed to update user.",
        );
    };

    view! {
        {table.error_banner()}
        {move || load_view(table.rows.get(), USERS, move |users| view! {
            <table class="learnhub-table">
                <thead>
                    <tr><th>"Username"</th><th>"Email"</th><th>"Role"</th><th>"Banned"</th><th>"Semi-admin"</th><th></th></tr>
                </thead>
                <tbody>
                    {users.into_iter().map(|u| {
                        let id = u.id;
                        view! {
                            <tr>
                                <td>{u.username}</td>
                                <td>{u.email}</td>
                                <td>{format::role_label(u.is_teacher, u.is_semi_admin)}</td>
                                <td>
                                    <input
                                        type="checkbox"
                                        prop:checked=u.is_banned
                                        disabled=move || table.is_busy(&id)
                                        on:change=move |ev| toggle(id, UserFlag::Banned, event_target_checked(&ev))
                                    />
                                </td>
                                <td>
                                    <input
                                        type="checkbox"
                                        prop:checked=u.is_semi_admin
                                        disabled=move || table.is_busy(&id)
                                        on:change=move |ev| toggle(id, UserFlag::SemiAdmin, event_target_checked(&ev))
                                    />
                                </td>
                                <td class="learnhub-field-error">{move || table.row_error(&id)}</td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        })}
    }
}

// ── Students ──

#[component]
fn StudentsTab() -> impl IntoView {
    let table: Table<StudentInfo, i64> = Table::new();
    table.load(|| async { api::client().students().await }, "Failed to load students.");

    let toggle = move |id: i64| {
        table.patch(
            id,
            move |rows| flip_where(rows, |s| s.id == id, |s| &mut s.is_banned),
            move |rows, old| {
                replace_where(rows, |s| s.id == id, |s| &mut s.is_banned, old);
            },
            move || async move { api::client().toggle_ban(id).await },
            move |rows, reply| {
                replace_where(rows, |s| s.id == reply.id, |s| &mut s.is_banned, reply.is_banned);
            },
            "Failed to update ban status.",
        );
    };

    view! {
        {table.error_banner()}
        {move || load_view(table.rows.get(), STUDENTS, move |students| view! {
            <table class="learnhub-table">
                <thead>
                    <tr><th>"Username"</th><th>"Email"</th><th>"Enrolled"</th><th>"Certificates"</th><th>"Status"</th><th></th></tr>
                </thead>
                <tbody>
                    {students.into_iter().map(|s| {
                        let id = s.id;
                        view! {
                            <tr>
                                <td>{s.username}</td>
                                <td>{s.email}</td>
                                <td>{s.enrolled_courses.join(", ")}</td>
                                <td>{s.certificates_earned.join(", ")}</td>
                                <td>
                                    {if s.is_banned {
                                        view! { <StatusBadge label="Banned" tone="danger" /> }.into_any()
                                    } else {
                                        view! { <StatusBadge label="Active" tone="success" /> }.into_any()
                                    }}
                                </td>
                                <td>
                                    <button
                                        class="learnhub-btn learnhub-btn-sm"
                                        disabled=move || table.is_busy(&id)
                                        on:click=move |_| toggle(id)
                                    >
                                        {if s.is_banned { "Unban" } else { "Ban" }}
                                    </button>
                                    <span class="learnhub-field-error">{move || table.row_error(&id)}</span>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        })}
    }
}

// ── Courses ──

#[component]
fn CoursesTab() -> impl IntoView {
    let table: Table<AdminCourse, String> = Table::new();
    table.load(|| async { api::client().admin_courses().await }, "Failed to load courses.");

    let toggle = move |slug: String| {
        let key = slug.clone();
        let matching = slug.clone();
        let restoring = slug.clone();
        table.patch(
            key,
            move |rows| flip_where(rows, |c| c.slug == matching, |c| &mut c.is_visible),
            move |rows, old| {
                replace_where(rows, |c| c.slug == restoring, |c| &mut c.is_visible, old);
            },
            move || async move { api::client().toggle_visibility(&slug).await },
            |rows, reply| {
                replace_where(rows, |c| c.slug == reply.id, |c| &mut c.is_visible, reply.is_visible);
            },
            "Failed to update course visibility.",
        );
    };

    view! {
        {table.error_banner()}
        {move || load_view(table.rows.get(), COURSES, move |courses| view! {
            <table class="learnhub-table">
                <thead>
                    <tr><th>"Course"</th><th>"Instructor"</th><th>"Visibility"</th><th></th></tr>
                </thead>
                <tbody>
                    {courses.into_iter().map(|c| {
                        let busy_key = c.slug.clone();
                        let error_key = c.slug.clone();
                        let slug = c.slug.clone();
                        view! {
                            <tr>
                                <td>{c.name}</td>
                                <td>{c.author_name}</td>
                                <td>
                                    {if c.is_visible {
                                        view! { <StatusBadge label="Visible" tone="success" /> }.into_any()
                                    } else {
                                        view! { <StatusBadge label="Hidden" tone="warning" /> }.into_any()
                                    }}
                                </td>
                                <td>
                                    <button
                                        class="learnhub-btn learnhub-btn-sm"
                                        disabled=move || table.is_busy(&busy_key)
                                        on:click=move |_| toggle(slug.clone())
                                    >
                                        {if c.is_visible { "Hide" } else { "Show" }}
                                    </button>
                                    <span class="learnhub-field-error">{move || table.row_error(&error_key)}</span>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        })}
    }
}

// ── Teacher applications ──

#[component]
fn ApplicationsTab() -> impl IntoView {
    let table: Table<TeacherApplication, i64> = Table::new();
    table.load(
        || async { api::client().teacher_applications().await },
        "Failed to load teacher applications.",
    );

    let decide = move |id: i64, target: ApplicationStatus| {
        table.patch(
            id,
            move |rows| {
                let row = rows.iter_mut().find(|a| a.id == id)?;
                if !row.status.can_move_to(target) {
                    return None;
                }
                Some(std::mem::replace(&mut row.status, target))
            },
            move |rows, old| {
                replace_where(rows, |a| a.id == id, |a| &mut a.status, old);
            },
            move || async move { api::client().set_application_status(id, target).await },
            |_, ()| {},
            "Failed to update application status.",
        );
    };

    view! {
        {table.error_banner()}
        {move || load_view(table.rows.get(), APPLICATIONS, move |apps| view! {
            <div class="learnhub-applications">
                {apps.into_iter().map(|a| {
                    let id = a.id;
                    let tone = match a.status {
                        ApplicationStatus::Approved => "success",
                        ApplicationStatus::Rejected => "danger",
                        ApplicationStatus::OnHold => "warning",
                        ApplicationStatus::Pending => "neutral",
                    };
                    view! {
                        <div class="learnhub-card">
                            <h3>{a.user}</h3>
                            <StatusBadge label=a.status.label() tone=tone />
                            <p><strong>"Education: "</strong>{a.highest_education}</p>
                            <p><strong>"Skills: "</strong>{a.skills}</p>
                            <p><strong>"Expertise: "</strong>{a.expertise}</p>
                            <p><strong>"Experience: "</strong>{a.past_experience}</p>
                            <p class="learnhub-meta">{format!("Submitted {}", format::date(a.submitted_at.as_ref()))}</p>
                            <div class="learnhub-actions">
                                {a.status.actions().iter().map(|action| {
                                    let target = action.target;
                                    view! {
                                        <button
                                            class="learnhub-btn learnhub-btn-sm"
                                            disabled=move || table.is_busy(&id)
                                            on:click=move |_| decide(id, target)
                                        >
                                            {action.label}
                                        </button>
                                    }
                                }).collect_view()}
                            </div>
                            <p class="learnhub-field-error">{move || table.row_error(&id)}</p>
                        </div>
                    }
                }).collect_view()}
            </div>
        })}
    }
}
