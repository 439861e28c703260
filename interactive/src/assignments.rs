use leptos::ev::SubmitEvent;
use leptos::html::Input;
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use learnhub_shared::format;
use learnhub_shared::forms::{FormInput, FormState, GradeForm, SubmissionForm};
use learnhub_shared::models::{own_submission, split_by_grade, Assignment, Submission};
use learnhub_shared::{ApiError, LoadState};
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::widgets::{field_error, form_banners, load_view, Texts};

const ASSIGNMENT: Texts = Texts::new("Loading assignment...", "Assignment not found.");
const SUBMISSIONS: Texts = Texts::new("Loading submissions...", "No submissions yet.");

async fn find_assignment(module_slug: &str, id: i64) -> Result<Assignment, ApiError> {
    api::client()
        .module_assignments(module_slug)
        .await?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or(ApiError::NotFound)
}

fn fetch_submissions(id: i64, state: RwSignal<LoadState<Vec<Submission>>>) {
    spawn_local(async move {
        state.set(LoadState::from_list(
            api::client().submissions(id).await,
            "Failed to load submissions.",
        ));
    });
}

#[component]
pub fn AssignmentPanel() -> impl IntoView {
    let params = use_params_map();
    let key = Memo::new(move |_| {
        let p = params.get();
        let module = p.get("module_slug").unwrap_or_default();
        let id = p.get("assignment_id").and_then(|id| id.parse::<i64>().ok());
        (module, id)
    });
    let assignment: RwSignal<LoadState<Assignment>> = RwSignal::new(LoadState::Loading);

    Effect::new(move |_| {
        let (module, id) = key.get();
        let Some(id) = id else {
            assignment.set(LoadState::Failed("Invalid assignment id.".into()));
            return;
        };
        spawn_local(async move {
            assignment.set(LoadState::from_item(
                find_assignment(&module, id).await,
                "Failed to load assignment.",
            ));
        });
    });

    view! {
        <section class="learnhub-assignment">
            <h2>"Assignment Details"</h2>
            {move || load_view(assignment.get(), ASSIGNMENT, |a| {
                let is_author = a.is_author;
                let id = a.id;
                view! {
                    <div class="learnhub-card">
                        <h3>{a.title.clone()}</h3>
                        <p>{a.description.clone()}</p>
                        <p class="learnhub-meta">{format!("Deadline: {}", format::date(a.deadline.as_ref()))}</p>
                        {a.question_pdf.as_deref().map(api::media_url).map(|href| view! {
                            <a href=href target="_blank" rel="noreferrer">"Download PDF"</a>
                        })}
                    </div>
                    {if is_author {
                        view! { <AuthorSubmissions assignment_id=id /> }.into_any()
                    } else {
                        view! { <StudentSubmission assignment_id=id /> }.into_any()
                    }}
                }
            })}
        </section>
    }
}

// ── Author ──

#[component]
fn AuthorSubmissions(assignment_id: i64) -> impl IntoView {
    let state: RwSignal<LoadState<Vec<Submission>>> = RwSignal::new(LoadState::Loading);
    fetch_submissions(assignment_id, state);

    view! {
        {move || load_view(state.get(), SUBMISSIONS, move |subs| {
            let (ungraded, graded) = split_by_grade(subs);
            view! {
                <h3>"Ungraded Submissions"</h3>
                {if ungraded.is_empty() {
                    view! { <p class="learnhub-empty">"Everything is graded."</p> }.into_any()
                } else {
                    ungraded
                        .into_iter()
                        .map(|s| view! { <GradeRow submission=s assignment_id=assignment_id state=state /> })
                        .collect_view()
                        .into_any()
                }}
                <h3>"Graded Submissions"</h3>
                {graded.into_iter().map(|s| view! { <SubmissionCard submission=s /> }).collect_view()}
            }
        })}
    }
}

#[component]
fn SubmissionCard(submission: Submission) -> impl IntoView {
    view! {
        <div class="learnhub-card">
            <p><strong>{submission.student_name.clone()}</strong></p>
            {submission.submitted_file.as_deref().map(api::media_url).map(|href| view! {
                <a href=href target="_blank" rel="noreferrer">"Submitted file"</a>
            })}
            {submission.comment.clone().filter(|c| !c.is_empty()).map(|c| view! { <p>{c}</p> })}
            {submission.grade.as_ref().map(|g| view! { <p>{format!("Grade: {g}")}</p> })}
            {submission.feedback.clone().map(|f| view! { <p>{format!("Feedback: {f}")}</p> })}
            {submission.corrected_file.as_deref().map(api::media_url).map(|href| view! {
                <a href=href target="_blank" rel="noreferrer">"Corrected file"</a>
            })}
        </div>
    }
}

#[component]
fn GradeRow(
    submission: Submission,
    assignment_id: i64,
    state: RwSignal<LoadState<Vec<Submission>>>,
) -> impl IntoView {
    let form = RwSignal::new(FormState::new(GradeForm::default()));
    let corrected: NodeRef<Input> = NodeRef::new();
    let id = submission.id;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        if let Err(errors) = values.check() {
            form.update(|f| f.fail(errors));
            return;
        }
        let file = corrected
            .get()
            .and_then(|el| el.files())
            .and_then(|files| files.get(0));
        form.update(|f| f.begin());
        spawn_local(async move {
            match api::client().grade_submission(id, &values, file).await {
                Ok(()) => fetch_submissions(assignment_id, state),
                Err(err) => {
                    tracing::warn!(error = %err, submission = id, "grading failed");
                    form.update(|f| f.fail_with(err, "Failed to save grade."));
                }
            }
        });
    };

    view! {
        <form class="learnhub-card" on:submit=on_submit>
            <SubmissionCard submission=submission />
            {form_banners(form)}
            <input
                type="number"
                step="0.01"
                placeholder="Grade"
                prop:value=move || form.with(|f| f.values.grade.clone())
                on:input=move |ev| form.update(|f| { f.values.grade = event_target_value(&ev); f.touch("grade"); })
            />
            {field_error(form, "grade")}
            <textarea
                placeholder="Feedback"
                prop:value=move || form.with(|f| f.values.feedback.clone())
                on:input=move |ev| form.update(|f| f.values.feedback = event_target_value(&ev))
            ></textarea>
            <input type="file" node_ref=corrected />
            <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>"Submit Grade"</button>
        </form>
    }
}

// ── Student ──

#[component]
fn StudentSubmission(assignment_id: i64) -> impl IntoView {
    let state: RwSignal<LoadState<Vec<Submission>>> = RwSignal::new(LoadState::Loading);
    fetch_submissions(assignment_id, state);

    view! {
        {move || match state.get() {
            LoadState::Ready(subs) => match own_submission(&subs).cloned() {
                Some(mine) => view! {
                    <h3>"Your Submission"</h3>
                    <SubmissionCard submission=mine />
                }
                .into_any(),
                None => view! { <SubmitForm assignment_id=assignment_id state=state /> }.into_any(),
            },
            LoadState::Empty => view! { <SubmitForm assignment_id=assignment_id state=state /> }.into_any(),
            other => load_view(other, SUBMISSIONS, |_| ()),
        }}
    }
}

#[component]
fn SubmitForm(assignment_id: i64, state: RwSignal<LoadState<Vec<Submission>>>) -> impl IntoView {
    let form = RwSignal::new(FormState::new(SubmissionForm::default()));
    let file_input: NodeRef<Input> = NodeRef::new();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        let file = file_input
            .get()
            .and_then(|el| el.files())
            .and_then(|files| files.get(0));
        form.update(|f| f.begin());
        spawn_local(async move {
            match api::client().submit_assignment(assignment_id, &values, file).await {
                Ok(()) => fetch_submissions(assignment_id, state),
                Err(err) => {
                    tracing::warn!(error = %err, "submission failed");
                    form.update(|f| f.fail_with(err, "Submission failed."));
                }
            }
        });
    };

    view! {
        <form class="learnhub-card" on:submit=on_submit>
            <h3>"Submit Your Work"</h3>
            {form_banners(form)}
            <input type="file" node_ref=file_input />
            {field_error(form, "submitted_file")}
            <textarea
                placeholder="Comment"
                prop:value=move || form.with(|f| f.values.comment.clone())
                on:input=move |ev| form.update(|f| f.values.comment = event_target_value(&ev))
            ></textarea>
            <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>"Submit"</button>
        </form>
    }
}
