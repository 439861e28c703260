use leptos::prelude::*;
use learnhub_shared::certificate::clamp_progress;
use learnhub_shared::forms::FormState;
use learnhub_shared::LoadState;

/// Static texts for the non-ready branches of a screen.
#[derive(Debug, Clone, Copy)]
pub struct Texts {
    pub loading: &'static str,
    pub unauthorized: &'static str,
    pub empty: &'static str,
}

impl Texts {
    pub const fn new(loading: &'static str, empty: &'static str) -> Self {
        Self {
            loading,
            unauthorized: "You must be logged in to view this page.",
            empty,
        }
    }

    pub const fn denied(self, unauthorized: &'static str) -> Self {
        Self {
            unauthorized,
            ..self
        }
    }
}

/// One branch per load state; `ready` renders the data.
pub fn load_view<T, V>(state: LoadState<T>, texts: Texts, ready: impl FnOnce(T) -> V) -> AnyView
where
    V: IntoView + 'static,
{
    match state {
        LoadState::Loading => view! { <p class="learnhub-loading">{texts.loading}</p> }.into_any(),
        LoadState::Unauthorized => {
            view! { <p class="learnhub-error">{texts.unauthorized}</p> }.into_any()
        }
        LoadState::Failed(message) => view! { <p class="learnhub-error">{message}</p> }.into_any(),
        LoadState::Empty => view! { <p class="learnhub-empty">{texts.empty}</p> }.into_any(),
        LoadState::Ready(data) => ready(data).into_any(),
    }
}

/// Inline message under a form field.
pub fn field_error<T: Send + Sync + 'static>(
    form: RwSignal<FormState<T>>,
    field: &'static str,
) -> impl IntoView {
    move || {
        form.with(|f| {
            f.errors
                .first(field)
                .map(|m| view! { <p class="learnhub-field-error">{m.to_string()}</p> })
        })
    }
}

/// General error and success banners of a form.
pub fn form_banners<T: Send + Sync + 'static>(form: RwSignal<FormState<T>>) -> impl IntoView {
    view! {
        {move || form.with(|f| f.success.clone().map(|m| view! { <p class="learnhub-success">{m}</p> }))}
        {move || form.with(|f| f.errors.general().map(|m| view! { <p class="learnhub-error">{m.to_string()}</p> }))}
    }
}

#[component]
pub fn ProgressBar(#[prop(into)] progress: Signal<u8>) -> impl IntoView {
    let pct = move || clamp_progress(progress.get());
    view! {
        <div class="learnhub-progress">
            <div class="learnhub-progress-fill" style:width=move || format!("{}%", pct())></div>
            <span class="learnhub-progress-label">{move || format!("{}% complete", pct())}</span>
        </div>
    }
}

#[component]
pub fn StatusBadge(label: &'static str, #[prop(optional)] tone: &'static str) -> impl IntoView {
    let tone = if tone.is_empty() { "neutral" } else { tone };
    view! { <span class=format!("learnhub-badge learnhub-badge-{tone}")>{label}</span> }
}
