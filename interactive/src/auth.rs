use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::components::{Redirect, A};
use leptos_router::hooks::use_navigate;
use learnhub_shared::forms::{FormInput, FormState, LoginForm, SignupForm};
use learnhub_shared::session::GuardDecision;
use wasm_bindgen_futures::spawn_local;

use crate::api;
use crate::widgets::field_error;

/// Reactive mirror of the stored session, shared via context.
#[derive(Clone, Copy, Debug)]
pub struct AuthState {
    pub token: RwSignal<Option<String>>,
    pub username: RwSignal<Option<String>>,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        self.token.get().is_some()
    }

    /// Re-read storage after a login or logout.
    pub fn refresh(&self) {
        let client = api::client();
        self.token.set(client.session().access_token());
        self.username.set(client.session().username());
    }

    pub fn logout(&self) {
        api::client().logout();
        self.refresh();
    }
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let session = api::client();
    let auth = AuthState {
        token: RwSignal::new(session.session().access_token()),
        username: RwSignal::new(session.session().username()),
    };
    provide_context(auth);

    children()
}

/// Renders children only while a token is stored.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthState>();

    move || {
        // the token signal only re-triggers; the decision is the stored session's
        auth.token.track();
        match api::client().session().guard() {
            GuardDecision::Allow => children().into_any(),
            GuardDecision::RedirectToLogin => view! { <Redirect path="/login" /> }.into_any(),
        }
    }
}

#[component]
pub fn LogoutButton() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let navigate = use_navigate();

    let on_logout = move |_| {
        auth.logout();
        navigate("/login", Default::default());
    };

    view! {
        <button class="learnhub-btn learnhub-btn-sm" on:click=on_logout>"Logout"</button>
    }
}

#[component]
pub fn Login() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let form = RwSignal::new(FormState::new(LoginForm::default()));
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
            match api::client().login(&values).await {
                Ok(_) => {
                    auth.refresh();
                    form.update(|f| f.submitting = false);
                    navigate("/dashboard", Default::default());
                }
                Err(err) => {
                    tracing::warn!(error = %err, "login failed");
                    form.update(|f| f.fail_with(err, "Invalid username or password."));
                }
            }
        });
    };

    view! {
        <section class="learnhub-auth-form">
            <h2>"Login"</h2>
            {move || form.with(|f| f.errors.general().map(|m| view! { <p class="learnhub-error">{m.to_string()}</p> }))}
            <form on:submit=on_submit>
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=move || form.with(|f| f.values.username.clone())
                    on:input=move |ev| form.update(|f| {
                        f.values.username = event_target_value(&ev);
                        f.touch("username");
                    })
                />
                {field_error(form, "username")}
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || form.with(|f| f.values.password.clone())
                    on:input=move |ev| form.update(|f| {
                        f.values.password = event_target_value(&ev);
                        f.touch("password");
                    })
                />
                {field_error(form, "password")}
                <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>
                    "Login"
                </button>
            </form>
            <p>"No account? " <A href="/signup">"Sign up"</A></p>
        </section>
    }
}

#[component]
pub fn Signup() -> impl IntoView {
    let form = RwSignal::new(FormState::new(SignupForm::default()));
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
            match api::client().signup(&values).await {
                Ok(()) => {
                    form.update(|f| f.submitting = false);
                    navigate("/login", Default::default());
                }
                Err(err) => {
                    tracing::warn!(error = %err, "signup failed");
                    form.update(|f| f.fail_with(err, "Signup failed. Please try again."));
                }
            }
        });
    };

    let input = move |name: &'static str, kind: &'static str, placeholder: &'static str| {
        view! {
            <input
                type=kind
                placeholder=placeholder
                prop:value=move || form.with(|f| signup_field(&f.values, name).to_string())
                on:input=move |ev| form.update(|f| {
                    *signup_field_mut(&mut f.values, name) = event_target_value(&ev);
                    f.touch(name);
                })
            />
            {field_error(form, name)}
        }
    };

    view! {
        <section class="learnhub-auth-form">
            <h2>"Signup"</h2>
            {move || form.with(|f| f.errors.general().map(|m| view! { <p class="learnhub-error">{m.to_string()}</p> }))}
            <form on:submit=on_submit>
                {input("email", "email", "Email")}
                {input("username", "text", "Username")}
                {input("password", "password", "Password")}
                {input("password2", "password", "Confirm Password")}
                <button class="learnhub-btn" type="submit" disabled=move || form.with(|f| f.submitting)>
                    "Signup"
                </button>
            </form>
            <p>"Already registered? " <A href="/login">"Login"</A></p>
        </section>
    }
}

fn signup_field<'a>(form: &'a SignupForm, name: &str) -> &'a str {
    match name {
        "email" => &form.email,
        "username" => &form.username,
        "password" => &form.password,
        _ => &form.password2,
    }
}

fn signup_field_mut<'a>(form: &'a mut SignupForm, name: &str) -> &'a mut String {
    match name {
        "email" => &mut form.email,
        "username" => &mut form.username,
        "password" => &mut form.password,
        _ => &mut form.password2,
    }
}
