use leptos::prelude::*;
use learnhub_shared::certificate::{CertificateEvent, CertificatePanel, CertificateReview};
use learnhub_shared::format;
use learnhub_shared::models::{CourseProgress, PendingCertificate};
use learnhub_shared::LoadState;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::widgets::{load_view, ProgressBar, StatusBadge, Texts};

const PROGRESS: Texts = Texts::new("Loading progress...", "No progress yet.");
const PENDING: Texts = Texts::new("Loading applications...", "No pending certificate applications.")
    .denied("You are not authorized to review certificates.");

/// Progress bar and certificate control for an enrolled learner.
#[component]
pub fn CertificateSlot(slug: String) -> impl IntoView {
    let state: RwSignal<LoadState<CourseProgress>> = RwSignal::new(LoadState::Loading);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let busy = RwSignal::new(false);

    {
        let slug = slug.clone();
        spawn_local(async move {
            state.set(LoadState::from_item(
                api::client().course_progress(&slug).await,
                "Failed to load progress.",
            ));
        });
    }

    let apply = move |_| {
        let slug = slug.clone();
        busy.set(true);
        error.set(None);
        spawn_local(async move {
            match api::client().apply_certificate(&slug).await {
                Ok(()) => state.update(|s| {
                    if let Some(p) = s.ready_mut() {
                        match p.certificate_status.apply(CertificateEvent::Apply { progress: p.progress }) {
                            Ok(next) => p.certificate_status = next,
                            Err(e) => tracing::warn!(error = %e, "local certificate state out of sync"),
                        }
                    }
                }),
                Err(err) => {
                    tracing::warn!(error = %err, "certificate application failed");
                    error.set(Some(err.message_or("Failed to apply for certificate.")));
                }
            }
            busy.set(false);
        });
    };

    view! {
        <section class="learnhub-certificate">
            {move || load_view(state.get(), PROGRESS, |p| {
                let panel = CertificatePanel::resolve(
                    true,
                    p.progress,
                    p.certificate_status,
                    p.certificate_url.as_deref(),
                );
                let control = match panel {
                    CertificatePanel::Hidden => ().into_any(),
                    CertificatePanel::InProgress { progress } => view! {
                        <p class="learnhub-meta">{format!("Complete the course to apply for a certificate ({progress}%).")}</p>
                    }
                    .into_any(),
                    CertificatePanel::Apply => view! {
                        <button class="learnhub-btn" on:click=apply.clone() disabled=move || busy.get()>
                            "Apply for Certificate"
                        </button>
                    }
                    .into_any(),
                    CertificatePanel::Pending => {
                        view! { <StatusBadge label="Certificate pending review" tone="warning" /> }.into_any()
                    }
                    CertificatePanel::Approved { download } => view! {
                        <StatusBadge label="Certificate approved" tone="success" />
                        {download.map(|path| view! {
                            <a class="learnhub-btn" href=api::media_url(&path) target="_blank" rel="noopener">
                                "Download Certificate"
                            </a>
                        })}
                    }
                    .into_any(),
                    CertificatePanel::Rejected => {
                        view! { <StatusBadge label="Certificate rejected" tone="danger" /> }.into_any()
                    }
                };
                view! {
                    <ProgressBar progress=p.progress />
                    {control}
                }
            })}
            {move || error.get().map(|m| view! { <p class="learnhub-error">{m}</p> })}
        </section>
    }
}

// ── Reviewer queue ──

fn fetch_pending(state: RwSignal<LoadState<Vec<PendingCertificate>>>) {
    spawn_local(async move {
        state.set(LoadState::from_list(
            api::client().pending_certificates().await,
            "Failed to load certificate applications.",
        ));
    });
}

/// Approve/reject re-fetch the queue afterwards.
#[component]
pub fn PendingCertificates() -> impl IntoView {
    let state: RwSignal<LoadState<Vec<PendingCertificate>>> = RwSignal::new(LoadState::Loading);
    let submitting: RwSignal<Option<i64>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    fetch_pending(state);

    let review = move |id: i64, decision: CertificateReview| {
        if submitting.get_untracked().is_some() {
            return;
        }
        submitting.set(Some(id));
        error.set(None);
        spawn_local(async move {
            if let Err(err) = api::client().review_certificate(id, decision).await {
                tracing::warn!(error = %err, id, "certificate review failed");
                error.set(Some(err.message_or("Failed to update certificate.")));
            }
            submitting.set(None);
            fetch_pending(state);
        });
    };

    view! {
        <section class="learnhub-pending-certs">
            <h2>"Pending Certificates"</h2>
            {move || error.get().map(|m| view! { <p class="learnhub-error">{m}</p> })}
            {move || load_view(state.get(), PENDING, move |rows| view! {
                <table class="learnhub-table">
                    <thead>
                        <tr><th>"Student"</th><th>"Email"</th><th>"Course"</th><th>"Progress"</th><th>"Applied"</th><th></th></tr>
                    </thead>
                    <tbody>
                        {rows.into_iter().map(|row| {
                            let id = row.id;
                            let busy = move || submitting.get() == Some(id);
                            view! {
                                <tr>
                                    <td>{row.student_name}</td>
                                    <td>{row.student_email}</td>
                                    <td>{row.course_title}</td>
                                    <td>{format!("{}%", row.progress)}</td>
                                    <td>{format::date(row.applied_at.as_ref())}</td>
                                    <td>
                                        <button class="learnhub-btn learnhub-btn-sm" disabled=busy
                                            on:click=move |_| review(id, CertificateReview::Approve)>"Approve"</button>
                                        <button class="learnhub-btn learnhub-btn-sm learnhub-btn-danger" disabled=busy
                                            on:click=move |_| review(id, CertificateReview::Reject)>"Reject"</button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            })}
        </section>
    }
}
