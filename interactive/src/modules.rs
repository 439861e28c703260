use leptos::ev::SubmitEvent;
use leptos::html::Input;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_params_map};
use learnhub_shared::format;
use learnhub_shared::forms::{ContentForm, FormInput, FormState, ModuleForm, ModuleUpdate};
use learnhub_shared::models::{
    partition_items, Assignment, ContentType, Course, Module, ModuleContent,
};
use learnhub_shared::{ApiError, LoadState};
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::widgets::{field_error, form_banners, load_view, StatusBadge, Texts};

const MODULE: Texts = Texts::new("Loading module...", "Module not found.");
const CONTENT: Texts = Texts::new("Loading content...", "Content not found.");
const AUTHOR_ONLY: Texts = Texts::new("Loading course...", "Course not found.")
    .denied("Unauthorized: only the course author can do this.");

fn content_title(c: &ModuleContent) -> String {
    c.title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| c.content_type.label().to_string())
}

// ── Accordion on the course page ──

/// One module open at a time.
#[component]
pub fn ModuleAccordion(modules: Vec<Module>, course_slug: String, is_author: bool) -> impl IntoView {
    let open: RwSignal<Option<String>> = RwSignal::new(None);

    if modules.is_empty() {
        return view! { <p class="learnhub-empty">"No modules yet."</p> }.into_any();
    }

    let items = modules
        .into_iter()
        .map(|module| {
            let slug = module.slug.clone();
            let toggle_slug = slug.clone();
            let is_open = {
                let slug = slug.clone();
                move || open.with(|o| o.as_deref() == Some(slug.as_str()))
            };
            let toggle = move |_| {
                let slug = toggle_slug.clone();
                open.update(|o| *o = if o.as_deref() == Some(slug.as_str()) { None } else { Some(slug) });
            };
            let add_href = format!("/courses/{course_slug}/modules/{slug}/add-content");
            let edit_href = format!("/modules/{slug}/edit");
            let heading = format!("{}. {}", module.order, module.title);
            let open_href = format!("/modules/{slug}");
            let description = module.description;
            let contents = module.contents;

            view! {
                <div class="learnhub-accordion-item">
                    <button class="learnhub-accordion-header" on:click=toggle>
                        {heading}
                    </button>
                    <Show when=is_open.clone()>
                        <div class="learnhub-accordion-body">
                            <p>{description.clone()}</p>
                            <ul>
                                {contents
                                    .iter()
                                    .map(|c| {
                                        let title = content_title(c);
                                        view! {
                                            <li>
                                                <A href=format!("/module-contents/{}", c.id)>{title}</A>
                                                " · "{c.content_type.label()}
                                                " · "{format::minutes(c.duration)}
                                                {c.is_completed.then(|| view! { <StatusBadge label="Completed" tone="success" /> })}
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                            <A href=open_href.clone()>"Open module"</A>
                            {is_author.then(|| view! {
                                <A href=add_href.clone()>"Add Content"</A>
                                <A href=edit_href.clone()>"Edit"</A>
                            })}
                        </div>
                    </Show>
                </div>
            }
        })
        .collect_view();

    view! {
        <section class="learnhub-accordion">
            <h3>"Course Modules"</h3>
            {items}
        </section>
    }
    .into_any()
}

// ── Module detail ──

#[derive(Clone, PartialEq)]
struct ModulePage {
    module: Module,
    study: Vec<ModuleContent>,
    graded: Vec<Assignment>,
}

async fn load_module_page(slug: &str) -> Result<ModulePage, ApiError> {
    let client = api::client();
    let module = client.module(slug).await?;
    let (study, graded) = partition_items(client.module_items(slug).await?);
    Ok(ModulePage {
        module,
        study,
        graded,
    })
}

#[component]
pub fn ModuleDetail() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.get().get("slug").unwrap_or_default());
    let state: RwSignal<LoadState<ModulePage>> = RwSignal::new(LoadState::Loading);

    Effect::new(move |_| {
        let slug = slug.get();
        state.set(LoadState::Loading);
        spawn_local(async move {
            state.set(LoadState::from_item(
                load_module_page(&slug).await,
                "Failed to load module.",
            ));
        });
    });

    view! {
        <section class="learnhub-module">
            {move || load_view(state.get(), MODULE, |page| {
                let slug = page.module.slug.clone();
                view! {
                    <h2>{page.module.title.clone()}</h2>
                    <p>{page.module.description.clone()}</p>
                    <p class="learnhub-meta">{format!("Last updated {}", format::date(page.module.last_updated.as_ref()))}</p>

                    <h3>"Study Material"</h3>
                    {if page.study.is_empty() {
                        view! { <p class="learnhub-empty">"No study material yet."</p> }.into_any()
                    } else {
                        view! {
                            <ul>
                                {page.study.iter().map(|c| {
                                    let title = content_title(c);
                                    view! {
                                        <li>
                                            <A href=format!("/module-contents/{}", c.id)>{title}</A>
                                            " · "{c.content_type.label()}
                                            {c.is_completed.then(|| view! { <span class="learnhub-done">" ✓ Completed"</span> })}
                                        </li>
                                    }
                                }).collect_view()}
                            </ul>
                        }.into_any()
                    }}

                    <h3>"Assignments"</h3>
                    {if page.graded.is_empty() {
                        view! { <p class="learnhub-empty">"No assignments."</p> }.into_any()
                    } else {
                        view! {
                            <ul>
                                {page.graded.iter().map(|a| {
                                    let title = a.title.clone();
                                    view! {
                                        <li>
                                            <A href=format!("/module/{slug}/assignment/{}", a.id)>{title}</A>
                                            " · due "{format::date(a.deadline.as_ref())}
                                        </li>
                                    }
                                }).collect_view()}
                            </ul>
                        }.into_any()
                    }}
                }
            })}
        </section>
    }
}

// ── Add module ──

#[component]
pub fn AddModule() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.get().get("slug").unwrap_or_default());
    let course: RwSignal<LoadState<Course>> = RwSignal::new(LoadState::Loading);

    Effect::new(move |_| {
        let slug = slug.get();
        spawn_local(async move {
            course.set(LoadState::from_item(
                api::client().course(&slug).await,
                "Failed to load course.",
            ));
        });
    });

    view! {
        <section class="learnhub-form">
            {move || {
                let state = course.get().map(|c| c.is_author.then_some(c));
                match state {
                    LoadState::Ready(None) => load_view(LoadState::<()>::Unauthorized, AUTHOR_ONLY, |_| ()),
                    other => load_view(other.map(|c| c.unwrap_or_default()), AUTHOR_ONLY, |c| {
                        view! { <ModuleFormView course=c /> }
                    }),
                }
            }}
        </section>
    }
}

#[component]
fn ModuleFormView(course: Course) -> impl IntoView {
    let form = RwSignal::new(FormState::new(ModuleForm::for_course(&course.slug)));
    let navigate = use_navigate();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        if let Err(errors) = values.check() {
            form.update(|f| f.fail(errors));
            return;
        }
        form.update(|f| f.begin());
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::client().create_module(&values).await {
                Ok(_) => navigate(&format!("/courses/{}", values.course), Default::default()),
                Err(err) => {
                    tracing::warn!(error = %err, "adding module failed");
                    form.update(|f| f.fail_with(err, "Failed to add module."));
                }
            }
        });
    };

    view! {
        <h2>{format!("Add Module to {}", course.name)}</h2>
        {form_banners(form)}
        <form on:submit=on_submit>
            <input
                type="text"
                placeholder="Module title"
                prop:value=move || form.with(|f| f.values.title.clone())
                on:input=move |ev| form.update(|f| { f.values.title = event_target_value(&ev); f.touch("title"); })
            />
            {field_error(form, "title")}
            <textarea
                placeholder="Description"
                prop:value=move || form.with(|f| f.values.description.clone())
                on:input=move |ev| form.update(|f| f.values.description = event_target_value(&ev))
            ></textarea>
            <input
                type="number"
                min="1"
                prop:value=move || form.with(|f| f.values.order.to_string())
                on:input=move |ev| form.update(|f| f.values.order = event_target_value(&ev).parse().unwrap_or(1))
            />
            {field_error(form, "order")}
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || form.with(|f| f.values.is_published)
                    on:change=move |ev| form.update(|f| f.values.is_published = event_target_checked(&ev))
                />
                "Published"
            </label>
            <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>"Add Module"</button>
        </form>
    }
}

// ── Edit module ──

#[component]
pub fn EditModule() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.get().get("slug").unwrap_or_default());
    let state: RwSignal<LoadState<Module>> = RwSignal::new(LoadState::Loading);

    Effect::new(move |_| {
        let slug = slug.get();
        spawn_local(async move {
            state.set(LoadState::from_item(
                api::client().module(&slug).await,
                "Failed to load module.",
            ));
        });
    });

    view! {
        <section class="learnhub-form">
            <h2>"Edit Module"</h2>
            {move || load_view(state.get(), MODULE, |module| view! { <EditModuleForm module=module /> })}
        </section>
    }
}

#[component]
fn EditModuleForm(module: Module) -> impl IntoView {
    let form = RwSignal::new(FormState::new(ModuleUpdate {
        title: module.title.clone(),
        description: module.description.clone(),
    }));
    let navigate = use_navigate();
    let slug = module.slug;

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        form.update(|f| f.begin());
        let slug = slug.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::client().update_module(&slug, &values).await {
                Ok(_) => navigate(&format!("/modules/{slug}"), Default::default()),
                Err(err) => form.update(|f| f.fail_with(err, "Failed to update module.")),
            }
        });
    };

    view! {
        {form_banners(form)}
        <form on:submit=on_submit>
            <input
                type="text"
                prop:value=move || form.with(|f| f.values.title.clone())
                on:input=move |ev| form.update(|f| { f.values.title = event_target_value(&ev); f.touch("title"); })
            />
            {field_error(form, "title")}
            <textarea
                prop:value=move || form.with(|f| f.values.description.clone())
                on:input=move |ev| form.update(|f| f.values.description = event_target_value(&ev))
            ></textarea>
            <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>"Save"</button>
        </form>
    }
}

// ── Add content ──

#[component]
pub fn AddContent() -> impl IntoView {
    let params = use_params_map();
    let course_slug = Memo::new(move |_| params.get().get("course_slug").unwrap_or_default());
    let module_slug = Memo::new(move |_| params.get().get("module_slug").unwrap_or_default());
    let course: RwSignal<LoadState<Course>> = RwSignal::new(LoadState::Loading);

    Effect::new(move |_| {
        let slug = course_slug.get();
        spawn_local(async move {
            course.set(LoadState::from_item(
                api::client().course(&slug).await,
                "Failed to load course.",
            ));
        });
    });

    view! {
        <section class="learnhub-form">
            <h2>"Add Content"</h2>
            {move || match course.get().map(|c| c.is_author) {
                LoadState::Ready(false) => load_view(LoadState::<()>::Unauthorized, AUTHOR_ONLY, |_| ()),
                other => load_view(other, AUTHOR_ONLY, move |_| view! {
                    <ContentFormView module_slug=module_slug.get_untracked() />
                }),
            }}
        </section>
    }
}

#[component]
fn ContentFormView(module_slug: String) -> impl IntoView {
    let form = RwSignal::new(FormState::new(ContentForm::default()));
    let file_input: NodeRef<Input> = NodeRef::new();
    let navigate = use_navigate();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        let file = file_input
            .get()
            .and_then(|el| el.files())
            .and_then(|files| files.get(0));
        form.update(|f| f.begin());
        let slug = module_slug.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::client().create_content(&slug, &values, file).await {
                Ok(()) => navigate(&format!("/modules/{slug}"), Default::default()),
                Err(err) => {
                    tracing::warn!(error = %err, "adding content failed");
                    form.update(|f| f.fail_with(err, "Failed to add content."));
                }
            }
        });
    };

    let kind = move || form.with(|f| f.values.content_type);

    view! {
        {form_banners(form)}
        <form on:submit=on_submit>
            <input
                type="text"
                placeholder="Title"
                prop:value=move || form.with(|f| f.values.title.clone())
                on:input=move |ev| form.update(|f| f.values.title = event_target_value(&ev))
            />
            <select
                prop:value=move || kind().as_str()
                on:change=move |ev| form.update(|f| {
                    f.values.content_type = ContentType::parse(&event_target_value(&ev)).unwrap_or_default();
                })
            >
                {ContentType::ALL
                    .into_iter()
                    .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                    .collect_view()}
            </select>

            <Show when=move || kind() == ContentType::Text>
                <textarea
                    placeholder="Text content"
                    prop:value=move || form.with(|f| f.values.text.clone())
                    on:input=move |ev| form.update(|f| { f.values.text = event_target_value(&ev); f.touch("text"); })
                ></textarea>
                {field_error(form, "text")}
            </Show>
            <Show when=move || kind() == ContentType::Video>
                <input
                    type="url"
                    placeholder="Video URL"
                    prop:value=move || form.with(|f| f.values.video_url.clone().unwrap_or_default())
                    on:input=move |ev| form.update(|f| {
                        f.values.video_url = Some(event_target_value(&ev)).filter(|u| !u.is_empty());
                        f.touch("video_url");
                    })
                />
                {field_error(form, "video_url")}
            </Show>
            <div class:hidden=move || kind() != ContentType::File>
                <input type="file" node_ref=file_input />
                {field_error(form, "file")}
            </div>

            <label>"Order"</label>
            <input
                type="number"
                prop:value=move || form.with(|f| f.values.order.to_string())
                on:input=move |ev| form.update(|f| f.values.order = event_target_value(&ev).parse().unwrap_or(0))
            />
            <label>"Duration (minutes)"</label>
            <input
                type="number"
                prop:value=move || form.with(|f| f.values.duration.to_string())
                on:input=move |ev| form.update(|f| f.values.duration = event_target_value(&ev).parse().unwrap_or(0))
            />
            <label>
                <input
                    type="checkbox"
                    prop:checked=move || form.with(|f| f.values.is_required)
                    on:change=move |ev| form.update(|f| f.values.is_required = event_target_checked(&ev))
                />
                "Required"
            </label>
            <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>"Add Content"</button>
        </form>
    }
}

// ── Content viewer ──

#[component]
pub fn ContentView() -> impl IntoView {
    let params = use_params_map();
    let id = Memo::new(move |_| {
        params
            .get()
            .get("id")
            .and_then(|id| id.parse::<i64>().ok())
    });
    let state: RwSignal<LoadState<ModuleContent>> = RwSignal::new(LoadState::Loading);

    Effect::new(move |_| {
        let Some(id) = id.get() else {
            state.set(LoadState::Failed("Invalid content id.".into()));
            return;
        };
        spawn_local(async move {
            state.set(LoadState::from_item(
                api::client().content(id).await,
                "Failed to load content.",
            ));
        });
    });

    view! {
        <section class="learnhub-content">
            {move || load_view(state.get(), CONTENT, move |content| view! { <ContentBody content=content state=state /> })}
        </section>
    }
}

#[component]
fn ContentBody(content: ModuleContent, state: RwSignal<LoadState<ModuleContent>>) -> impl IntoView {
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let busy = RwSignal::new(false);
    let id = content.id;

    let mark_complete = move |_| {
        busy.set(true);
        spawn_local(async move {
            match api::client().complete_content(id).await {
                Ok(()) => state.update(|s| {
                    if let Some(c) = s.ready_mut() {
                        c.is_completed = true;
                    }
                }),
                Err(err) => {
                    tracing::warn!(error = %err, "marking content complete failed");
                    error.set(Some(if err.is_unauthorized() {
                        "Only enrolled students can track progress.".to_string()
                    } else {
                        err.message_or("Failed to mark as completed.")
                    }));
                }
            }
            busy.set(false);
        });
    };

    let body = match content.content_type {
        ContentType::Text => view! {
            <article class="learnhub-article">{content.text.clone().unwrap_or_default()}</article>
        }
        .into_any(),
        ContentType::Video => match content.video_url.clone() {
            Some(url) => view! {
                <iframe class="learnhub-video" src=url allowfullscreen=true></iframe>
            }
            .into_any(),
            None => view! { <p class="learnhub-empty">"No video attached."</p> }.into_any(),
        },
        ContentType::File => match content.file.as_deref().map(api::media_url) {
            Some(href) => view! {
                <a class="learnhub-btn" href=href target="_blank" rel="noopener">"Download file"</a>
            }
            .into_any(),
            None => view! { <p class="learnhub-empty">"No file attached."</p> }.into_any(),
        },
    };

    view! {
        <h2>{content_title(&content)}</h2>
        <p class="learnhub-meta">
            {content.content_type.label()}" · "{format::minutes(content.duration)}
            {content.is_required.then_some(" · Required")}
        </p>
        {body}
        {if content.is_completed {
            view! { <StatusBadge label="Completed" tone="success" /> }.into_any()
        } else {
            view! {
                <button class="learnhub-btn" on:click=mark_complete disabled=move || busy.get()>
                    "Mark as Completed"
                </button>
            }
            .into_any()
        }}
        {move || error.get().map(|m| view! { <p class="learnhub-error">{m}</p> })}
    }
}
