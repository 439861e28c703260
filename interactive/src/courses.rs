use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};
use learnhub_shared::debounce::Debouncer;
use learnhub_shared::format::{self, PREVIEW_LEN};
use learnhub_shared::forms::{CourseForm, CourseUpdate, FormInput, FormState};
use learnhub_shared::models::{Course, Level};
use learnhub_shared::roles::CourseRole;
use learnhub_shared::search::{Ordering, SearchFilter, CATEGORIES, PRICE_CEILING};
use learnhub_shared::LoadState;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::auth::AuthState;
use crate::certificates::CertificateSlot;
use crate::feedback::CourseFeedback;
use crate::modules::ModuleAccordion;
use crate::widgets::{field_error, form_banners, load_view, StatusBadge, Texts};

const COURSES: Texts = Texts::new("Loading courses...", "No courses available yet.");
const RESULTS: Texts = Texts::new("Searching...", "No courses match these filters.");
const DETAIL: Texts = Texts::new("Loading course...", "Course not found.");

// ── Cards ──

#[component]
fn CourseCard(course: Course) -> impl IntoView {
    let href = format!("/courses/{}", course.slug);
    let thumbnail = course.thumbnail.as_deref().map(api::media_url);
    view! {
        <A href=href attr:class="learnhub-course-card">
            {thumbnail.map(|src| view! { <img class="learnhub-thumb" src=src alt="" /> })}
            <h3>{course.name.clone()}</h3>
            <p>{format::truncate(&course.description, PREVIEW_LEN)}</p>
            <div class="learnhub-course-meta">
                <span>{course.instructor()}</span>
                <span>{format::price_label(&course.price)}</span>
                <span class="learnhub-stars">{format::stars(course.rating)}</span>
                <StatusBadge label=course.level.label() />
                {course.category.clone().map(|c| view! { <span class="learnhub-category">{c}</span> })}
            </div>
        </A>
    }
}

fn course_grid(courses: Vec<Course>) -> impl IntoView {
    view! {
        <div class="learnhub-course-grid">
            <For each=move || courses.clone() key=|c| c.slug.clone() let:course>
                <CourseCard course=course />
            </For>
        </div>
    }
}

// ── Catalog ──

#[component]
pub fn CourseList() -> impl IntoView {
    let state: RwSignal<LoadState<Vec<Course>>> = RwSignal::new(LoadState::Loading);

    spawn_local(async move {
        state.set(LoadState::from_list(
            api::client().courses().await,
            "Failed to load courses.",
        ));
    });

    view! {
        <section class="learnhub-courses">
            <h2>"All Courses"</h2>
            <A href="/search">"Search & filter"</A>
            {move || load_view(state.get(), COURSES, course_grid)}
        </section>
    }
}

// ── Search ──

#[component]
pub fn CourseSearch() -> impl IntoView {
    let filter = RwSignal::new(SearchFilter::default());
    let results: RwSignal<LoadState<Vec<Course>>> = RwSignal::new(LoadState::Loading);
    let debouncer = Debouncer::new(api::config().search_delay);

    // Every change restarts the delay; only the newest ticket may write results
    Effect::new(move |_| {
        let current = filter.get();
        let ticket = debouncer.schedule();
        let delay = debouncer.delay();
        let debouncer = debouncer.clone();
        set_timeout(
            move || {
                if !debouncer.is_current(ticket) {
                    return;
                }
                results.set(LoadState::Loading);
                spawn_local(async move {
                    let found = api::client().search_courses(&current).await;
                    if debouncer.is_current(ticket) {
                        results.set(LoadState::from_list(
                            found,
                            "Failed to load courses. Please try adjusting your filters or try again later.",
                        ));
                    } else {
                        tracing::debug!("dropping superseded search response");
                    }
                });
            },
            delay,
        );
    });

    view! {
        <section class="learnhub-search">
            <h2>"Find Courses"</h2>
            <div class="learnhub-filters">
                <input
                    type="text"
                    placeholder="Search courses..."
                    prop:value=move || filter.with(|f| f.search.clone())
                    on:input=move |ev| filter.update(|f| f.search = event_target_value(&ev))
                />
                <select on:change=move |ev| filter.update(|f| f.level = Level::parse(&event_target_value(&ev)))>
                    <option value="">"All Levels"</option>
                    {Level::ALL
                        .into_iter()
                        .map(|l| view! { <option value=l.as_str()>{l.label()}</option> })
                        .collect_view()}
                </select>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    filter.update(|f| f.category = Some(value).filter(|c| !c.is_empty()));
                }>
                    <option value="">"All Categories"</option>
                    {CATEGORIES
                        .into_iter()
                        .map(|c| view! { <option value=c.to_lowercase()>{c}</option> })
                        .collect_view()}
                </select>
                <select on:change=move |ev| filter.update(|f| f.ordering = Ordering::parse(&event_target_value(&ev)))>
                    <option value="">"Sort By"</option>
                    {Ordering::ALL
                        .into_iter()
                        .map(|o| view! { <option value=o.as_str()>{o.label()}</option> })
                        .collect_view()}
                </select>
                <label>
                    {move || format!("Min ₹{}", filter.with(|f| f.price_min))}
                    <input
                        type="range"
                        min="0"
                        max=PRICE_CEILING.to_string()
                        step="100"
                        prop:value=move || filter.with(|f| f.price_min.to_string())
                        on:input=move |ev| {
                            let v = event_target_value(&ev).parse().unwrap_or(0);
                            filter.update(|f| f.set_price_min(v));
                        }
                    />
                </label>
                <label>
                    {move || format!("Max ₹{}", filter.with(|f| f.price_max))}
                    <input
                        type="range"
                        min="0"
                        max=PRICE_CEILING.to_string()
                        step="100"
                        prop:value=move || filter.with(|f| f.price_max.to_string())
                        on:input=move |ev| {
                            let v = event_target_value(&ev).parse().unwrap_or(PRICE_CEILING);
                            filter.update(|f| f.set_price_max(v));
                        }
                    />
                </label>
            </div>
            {move || load_view(results.get(), RESULTS, course_grid)}
        </section>
    }
}

// ── Detail ──

fn fetch_course(slug: String, state: RwSignal<LoadState<Course>>) {
    spawn_local(async move {
        state.set(LoadState::from_item(
            api::client().course(&slug).await,
            "Failed to load course.",
        ));
    });
}

/// One screen for every viewer; controls depend on the viewer's role.
#[component]
pub fn CourseDetail() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.get().get("slug").unwrap_or_default());
    let state: RwSignal<LoadState<Course>> = RwSignal::new(LoadState::Loading);

    Effect::new(move |_| {
        state.set(LoadState::Loading);
        fetch_course(slug.get(), state);
    });

    view! {
        <section class="learnhub-course-detail">
            {move || load_view(state.get(), DETAIL, move |course| view! { <CourseBody course=course state=state /> })}
        </section>
    }
}

#[component]
fn CourseBody(course: Course, state: RwSignal<LoadState<Course>>) -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let role = CourseRole::of(&course, auth.token.get_untracked().is_some());
    let slug = course.slug.clone();
    let editing = RwSignal::new(false);
    let action_error: RwSignal<Option<String>> = RwSignal::new(None);
    let busy = RwSignal::new(false);
    let navigate = use_navigate();

    let enroll = {
        let slug = slug.clone();
        move |_| {
            let slug = slug.clone();
            busy.set(true);
            spawn_local(async move {
                match api::client().enroll(&slug).await {
                    Ok(_) => fetch_course(slug, state),
                    Err(err) => {
                        tracing::warn!(error = %err, "enroll failed");
                        action_error.set(Some(err.message_or("Enrollment failed.")));
                    }
                }
                busy.set(false);
            });
        }
    };

    let delete = {
        let slug = slug.clone();
        move |_| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Delete this course?").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            let slug = slug.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match api::client().delete_course(&slug).await {
                    Ok(()) => navigate("/dashboard", Default::default()),
                    Err(err) => action_error.set(Some(err.message_or("Failed to delete course."))),
                }
            });
        }
    };

    let controls = match role {
        CourseRole::Author => view! {
            <div class="learnhub-actions">
                <button class="learnhub-btn" on:click=move |_| editing.update(|e| *e = !*e)>
                    {move || if editing.get() { "Cancel" } else { "Edit Course" }}
                </button>
                <A href=format!("/courses/{slug}/add-module")>"Add Module"</A>
                <button class="learnhub-btn learnhub-btn-danger" on:click=delete>"Delete"</button>
            </div>
        }
        .into_any(),
        CourseRole::Visitor => view! {
            <button class="learnhub-btn" on:click=enroll disabled=move || busy.get()>"Enroll"</button>
        }
        .into_any(),
        CourseRole::Anonymous => view! {
            <p><A href="/login">"Login to enroll"</A></p>
        }
        .into_any(),
        CourseRole::Learner => view! { <StatusBadge label="Enrolled" tone="success" /> }.into_any(),
    };

    let edit_slug = course.slug.clone();
    let edit_seed = CourseUpdate {
        name: course.name.clone(),
        description: course.description.clone(),
        price: course.price.to_string(),
    };

    view! {
        <header class="learnhub-course-header">
            <h2>{course.name.clone()}</h2>
            <p>{course.description.clone()}</p>
            <div class="learnhub-course-meta">
                <span>{format!("Instructor: {}", course.instructor())}</span>
                <span>{format::price_label(&course.price)}</span>
                <span>{course.level.label()}</span>
                <span>{format::hours(course.duration)}</span>
                <span class="learnhub-stars">{format::stars(course.rating)}</span>
                <span>{format!("Launch: {}", course.launch_date.map(|d| d.to_string()).unwrap_or_else(|| "TBA".into()))}</span>
            </div>
            {controls}
            {move || action_error.get().map(|m| view! { <p class="learnhub-error">{m}</p> })}
        </header>
        <Show when=move || editing.get()>
            <CourseEditForm slug=edit_slug.clone() seed=edit_seed.clone() state=state editing=editing />
        </Show>
        {role.tracks_progress().then(|| view! { <CertificateSlot slug=course.slug.clone() /> })}
        <ModuleAccordion modules=course.modules.clone() course_slug=course.slug.clone() is_author=role.can_edit() />
        <CourseFeedback slug=course.slug.clone() can_review=role.can_review() />
    }
}

#[component]
fn CourseEditForm(
    slug: String,
    seed: CourseUpdate,
    state: RwSignal<LoadState<Course>>,
    editing: RwSignal<bool>,
) -> impl IntoView {
    let form = RwSignal::new(FormState::new(seed));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        if let Err(errors) = values.check() {
            form.update(|f| f.fail(errors));
            return;
        }
        form.update(|f| f.begin());
        let slug = slug.clone();
        spawn_local(async move {
            match api::client().update_course(&slug, &values).await {
                Ok(_) => {
                    editing.set(false);
                    fetch_course(slug, state);
                }
                Err(err) => form.update(|f| f.fail_with(err, "Failed to update course.")),
            }
        });
    };

    view! {
        <form class="learnhub-form" on:submit=on_submit>
            {form_banners(form)}
            <input
                type="text"
                prop:value=move || form.with(|f| f.values.name.clone())
                on:input=move |ev| form.update(|f| { f.values.name = event_target_value(&ev); f.touch("name"); })
            />
            {field_error(form, "name")}
            <textarea
                prop:value=move || form.with(|f| f.values.description.clone())
                on:input=move |ev| form.update(|f| f.values.description = event_target_value(&ev))
            ></textarea>
            <input
                type="number"
                step="0.01"
                prop:value=move || form.with(|f| f.values.price.clone())
                on:input=move |ev| form.update(|f| { f.values.price = event_target_value(&ev); f.touch("price"); })
            />
            {field_error(form, "price")}
            <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>"Save"</button>
        </form>
    }
}

// ── Create ──

#[component]
pub fn CreateCourse() -> impl IntoView {
    let form = RwSignal::new(FormState::new(CourseForm::default()));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        form.update(|f| f.begin());
        spawn_local(async move {
            match api::client().create_course(&values).await {
                Ok(course) => {
                    tracing::debug!(slug = %course.slug, "course created");
                    form.update(|f| f.succeed_and_reset("Course created successfully!"));
                }
                Err(err) => form.update(|f| f.fail_with(err, "An error occurred. Please try again.")),
            }
        });
    };

    view! {
        <section class="learnhub-form">
            <h2>"Create a New Course"</h2>
            {form_banners(form)}
            <form on:submit=on_submit>
                <label>"Course Name"</label>
                <input
                    type="text"
                    prop:value=move || form.with(|f| f.values.name.clone())
                    on:input=move |ev| form.update(|f| { f.values.name = event_target_value(&ev); f.touch("name"); })
                />
                {field_error(form, "name")}

                <label>"Description"</label>
                <textarea
                    prop:value=move || form.with(|f| f.values.description.clone())
                    on:input=move |ev| form.update(|f| { f.values.description = event_target_value(&ev); f.touch("description"); })
                ></textarea>
                {field_error(form, "description")}

                <label>"Price (₹)"</label>
                <input
                    type="number"
                    step="0.01"
                    prop:value=move || form.with(|f| f.values.price.clone())
                    on:input=move |ev| form.update(|f| { f.values.price = event_target_value(&ev); f.touch("price"); })
                />
                {field_error(form, "price")}

                <label>"Launch Date"</label>
                <input
                    type="date"
                    prop:value=move || form.with(|f| f.values.launch_date.clone())
                    on:input=move |ev| form.update(|f| { f.values.launch_date = event_target_value(&ev); f.touch("launch_date"); })
                />
                {field_error(form, "launch_date")}

                <label>"Duration (hours)"</label>
                <input
                    type="number"
                    prop:value=move || form.with(|f| f.values.duration.clone())
                    on:input=move |ev| form.update(|f| { f.values.duration = event_target_value(&ev); f.touch("duration"); })
                />
                {field_error(form, "duration")}

                <label>"Level"</label>
                <select
                    prop:value=move || form.with(|f| f.values.level.as_str())
                    on:change=move |ev| form.update(|f| f.values.level = Level::parse(&event_target_value(&ev)).unwrap_or_default())
                >
                    {Level::ALL
                        .into_iter()
                        .map(|l| view! { <option value=l.as_str()>{l.label()}</option> })
                        .collect_view()}
                </select>
                {field_error(form, "level")}

                <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>
                    "Create Course"
                </button>
            </form>
        </section>
    }
}
