use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use learnhub_shared::format;
use learnhub_shared::forms::{FeedbackForm, FormInput, FormState};
use learnhub_shared::models::{own_feedback, Feedback};
use learnhub_shared::LoadState;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::auth::AuthState;
use crate::widgets::{field_error, form_banners, load_view, Texts};

const REVIEWS: Texts = Texts::new("Loading reviews...", "No reviews yet.");

/// Rating form plus everyone's reviews. The form is prefilled from the
/// viewer's own review, matched by stored username.
#[component]
pub fn CourseFeedback(slug: String, can_review: bool) -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let list: RwSignal<LoadState<Vec<Feedback>>> = RwSignal::new(LoadState::Loading);
    let form = RwSignal::new(FormState::new(FeedbackForm::default()));

    let fetch = {
        let slug = slug.clone();
        move || {
            let slug = slug.clone();
            spawn_local(async move {
                let result = api::client().feedback(&slug).await;
                if let Ok(items) = &result {
                    let username = auth.username.get_untracked();
                    if let Some(mine) = own_feedback(items, username.as_deref()) {
                        let seed = FeedbackForm {
                            rating: mine.rating,
                            comment: mine.comment.clone(),
                        };
                        form.update(|f| f.values = seed);
                    }
                }
                list.set(LoadState::from_list(result, "Failed to load reviews."));
            });
        }
    };
    fetch();

    let on_submit = {
        let fetch = fetch.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let values = form.with_untracked(|f| f.values.clone());
            if let Err(errors) = values.check() {
                form.update(|f| f.fail(errors));
                return;
            }
            form.update(|f| f.begin());
            let slug = slug.clone();
            let fetch = fetch.clone();
            spawn_local(async move {
                match api::client().submit_feedback(&slug, &values).await {
                    Ok(()) => {
                        form.update(|f| {
                            f.submitting = false;
                            f.success = Some("Thanks for your feedback!".into());
                        });
                        fetch();
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "feedback failed");
                        form.update(|f| f.fail_with(err, "Failed to submit feedback."));
                    }
                }
            });
        }
    };

    let stars = move || {
        (1..=5u8)
            .map(|n| {
                view! {
                    <button
                        type="button"
                        class="learnhub-star"
                        class:active=move || form.with(|f| f.values.rating >= n)
                        on:click=move |_| form.update(|f| { f.values.rating = n; f.touch("rating"); })
                    >
                        "★"
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <section class="learnhub-feedback">
            <h3>"Rate this Course"</h3>
            {can_review.then(|| view! {
                <form on:submit=on_submit.clone()>
                    {form_banners(form)}
                    <div class="learnhub-stars">{stars()}</div>
                    {field_error(form, "rating")}
                    <textarea
                        placeholder="Leave a comment..."
                        prop:value=move || form.with(|f| f.values.comment.clone())
                        on:input=move |ev| form.update(|f| f.values.comment = event_target_value(&ev))
                    ></textarea>
                    <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>
                        "Submit Feedback"
                    </button>
                </form>
            })}
            {move || load_view(list.get(), REVIEWS, |items| view! {
                <ul class="learnhub-reviews">
                    {items.into_iter().map(|f| view! {
                        <li>
                            <strong>{f.user}</strong>
                            " "<span class="learnhub-stars">{format::stars(f32::from(f.rating))}</span>
                            <p>{f.comment}</p>
                            <time>{format::date(f.submitted_at.as_ref())}</time>
                        </li>
                    }).collect_view()}
                </ul>
            })}
        </section>
    }
}
