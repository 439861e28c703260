use leptos::ev::SubmitEvent;
use leptos::html::Input;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use learnhub_shared::format;
use learnhub_shared::forms::{FormInput, FormState, ProfileForm, TeacherApplicationForm};
use learnhub_shared::models::{Dashboard, User};
use learnhub_shared::LoadState;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::widgets::{field_error, form_banners, load_view, ProgressBar, StatusBadge, Texts};

const DASHBOARD: Texts = Texts::new("Loading dashboard...", "Nothing here yet.");
const PROFILE: Texts = Texts::new("Loading profile...", "Profile not found.");

// ── Dashboard ──

#[component]
pub fn DashboardPage() -> impl IntoView {
    let state: RwSignal<LoadState<Dashboard>> = RwSignal::new(LoadState::Loading);

    spawn_local(async move {
        state.set(LoadState::from_item(
            api::client().dashboard().await,
            "Failed to load dashboard.",
        ));
    });

    view! {
        <section class="learnhub-dashboard">
            <h2>"My Learning"</h2>
            {move || load_view(state.get(), DASHBOARD, |d| view! {
                {if d.enrolled_courses.is_empty() {
                    view! { <p class="learnhub-empty">"You are not enrolled in any course yet. " <A href="/courses">"Browse courses"</A></p> }.into_any()
                } else {
                    d.enrolled_courses.into_iter().map(|c| view! {
                        <div class="learnhub-card">
                            <A href=format!("/courses/{}", c.slug)>{c.name}</A>
                            <ProgressBar progress=c.progress />
                            <StatusBadge label=c.certificate_status.label() />
                        </div>
                    }).collect_view().into_any()
                }}
                {(!d.authored_courses.is_empty()).then(|| view! {
                    <h2>"Courses I Teach"</h2>
                    {d.authored_courses.into_iter().map(|c| view! {
                        <div class="learnhub-card">
                            <A href=format!("/courses/{}", c.slug)>{c.name}</A>
                            <span>{format::price_label(&c.price)}</span>
                        </div>
                    }).collect_view()}
                })}
            })}
        </section>
    }
}

// ── Profile ──

#[component]
pub fn Profile() -> impl IntoView {
    let state: RwSignal<LoadState<User>> = RwSignal::new(LoadState::Loading);

    spawn_local(async move {
        state.set(LoadState::from_item(
            api::client().me().await,
            "Failed to load profile.",
        ));
    });

    view! {
        <section class="learnhub-profile">
            {move || load_view(state.get(), PROFILE, |user| view! { <ProfileCard user=user /> })}
        </section>
    }
}

#[component]
fn ProfileCard(user: User) -> impl IntoView {
    let banner = user.banner_image.as_deref().map(api::media_url);
    let avatar = user.profile_image.as_deref().map(api::media_url);

    view! {
        {banner.map(|src| view! { <img class="learnhub-banner" src=src alt="" /> })}
        <div class="learnhub-card">
            {avatar.map(|src| view! { <img class="learnhub-avatar" src=src alt="" width="96" height="96" /> })}
            <h2>{user.full_name()}</h2>
            <p>{format!("@{}", user.username)}</p>
            <StatusBadge label=format::role_label(user.is_teacher, user.is_semi_admin) />
            {user.is_verified.then(|| view! { <StatusBadge label="Verified" tone="success" /> })}
            {user.is_banned.then(|| view! { <StatusBadge label="Banned" tone="danger" /> })}
            <p>{user.email.clone()}</p>
            <p>{user.bio.clone()}</p>
            {user.phone_number.clone().map(|p| view! { <p>{p}</p> })}
            {user.date_of_birth.map(|d| view! { <p>{format!("Born {d}")}</p> })}
            <p class="learnhub-meta">{format!("Joined {}", format::date(user.joined_at.as_ref()))}</p>
            <nav class="learnhub-actions">
                <A href="/edit_profile">"Edit Profile"</A>
                <A href="/dashboard">"Dashboard"</A>
                {user.is_teacher.then(|| view! { <A href="/courses/new">"Create Course"</A> })}
                {(!user.is_teacher).then(|| view! { <A href="/become-teacher">"Become a Teacher"</A> })}
                {user.is_semi_admin.then(|| view! {
                    <A href="/admin">"Admin Panel"</A>
                    <A href="/certificates/pending">"Pending Certificates"</A>
                })}
            </nav>
        </div>
    }
}

// ── Edit profile ──

#[component]
pub fn EditProfile() -> impl IntoView {
    let state: RwSignal<LoadState<User>> = RwSignal::new(LoadState::Loading);

    spawn_local(async move {
        state.set(LoadState::from_item(
            api::client().me().await,
            "Failed to load profile.",
        ));
    });

    view! {
        <section class="learnhub-form">
            <h2>"Edit Profile"</h2>
            {move || load_view(state.get(), PROFILE, |user| view! { <EditProfileForm user=user /> })}
        </section>
    }
}

#[component]
fn EditProfileForm(user: User) -> impl IntoView {
    let form = RwSignal::new(FormState::new(ProfileForm {
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        bio: user.bio,
    }));
    let image: NodeRef<Input> = NodeRef::new();
    let navigate = use_navigate();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        if let Err(errors) = values.check() {
            form.update(|f| f.fail(errors));
            return;
        }
        let file = image.get().and_then(|el| el.files()).and_then(|files| files.get(0));
        form.update(|f| f.begin());
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::client().update_profile(&values, file).await {
                Ok(_) => navigate("/profile", Default::default()),
                Err(err) => {
                    tracing::warn!(error = %err, "profile update failed");
                    form.update(|f| f.fail_with(err, "Failed to update profile."));
                }
            }
        });
    };

    view! {
        {form_banners(form)}
        <form on:submit=on_submit>
            <label>"First Name"</label>
            <input
                type="text"
                prop:value=move || form.with(|f| f.values.first_name.clone())
                on:input=move |ev| form.update(|f| f.values.first_name = event_target_value(&ev))
            />
            <label>"Last Name"</label>
            <input
                type="text"
                prop:value=move || form.with(|f| f.values.last_name.clone())
                on:input=move |ev| form.update(|f| f.values.last_name = event_target_value(&ev))
            />
            <label>"Email"</label>
            <input
                type="email"
                prop:value=move || form.with(|f| f.values.email.clone())
                on:input=move |ev| form.update(|f| { f.values.email = event_target_value(&ev); f.touch("email"); })
            />
            {field_error(form, "email")}
            <label>"Bio"</label>
            <textarea
                prop:value=move || form.with(|f| f.values.bio.clone())
                on:input=move |ev| form.update(|f| f.values.bio = event_target_value(&ev))
            ></textarea>
            <label>"Profile Image"</label>
            <input type="file" accept="image/*" node_ref=image />
            {field_error(form, "profile_image")}
            <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>"Save"</button>
        </form>
    }
}

// ── Apply to teach ──

#[component]
pub fn BecomeTeacher() -> impl IntoView {
    let form = RwSignal::new(FormState::new(TeacherApplicationForm::default()));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let values = form.with_untracked(|f| f.values.clone());
        if let Err(errors) = values.check() {
            form.update(|f| f.fail(errors));
            return;
        }
        form.update(|f| f.begin());
        spawn_local(async move {
            match api::client().submit_teacher_application(&values).await {
                Ok(()) => form.update(|f| {
                    f.succeed_and_reset("Your application has been submitted. We will review it soon.")
                }),
                Err(err) => {
                    // a second application comes back with the server's detail message
                    tracing::warn!(error = %err, "teacher application failed");
                    form.update(|f| f.fail_with(err, "Failed to submit application. Please try again."));
                }
            }
        });
    };

    let field = move |name: &'static str, label: &'static str| {
        view! {
            <label>{label}</label>
            <textarea
                prop:value=move || form.with(|f| application_field(&f.values, name).to_string())
                on:input=move |ev| form.update(|f| {
                    *application_field_mut(&mut f.values, name) = event_target_value(&ev);
                    f.touch(name);
                })
            ></textarea>
            {field_error(form, name)}
        }
    };

    view! {
        <section class="learnhub-form">
            <h2>"Become a Teacher"</h2>
            {form_banners(form)}
            <form on:submit=on_submit>
                {field("highest_education", "Highest Education")}
                {field("skills", "Skills")}
                {field("expertise", "Expertise")}
                {field("past_experience", "Past Experience")}
                <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>
                    "Submit Application"
                </button>
            </form>
        </section>
    }
}

fn application_field<'a>(form: &'a TeacherApplicationForm, name: &str) -> &'a str {
    match name {
        "highest_education" => &form.highest_education,
        "skills" => &form.skills,
        "expertise" => &form.expertise,
        _ => &form.past_experience,
    }
}

fn application_field_mut<'a>(form: &'a mut TeacherApplicationForm, name: &str) -> &'a mut String {
    match name {
        "highest_education" => &mut form.highest_education,
        "skills" => &mut form.skills,
        "expertise" => &mut form.expertise,
        _ => &mut form.past_experience,
    }
}
