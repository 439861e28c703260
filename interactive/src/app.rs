use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes, A};
use leptos_router::path;

use crate::admin::AdminPanel;
use crate::assignments::AssignmentPanel;
use crate::auth::{AuthProvider, AuthState, Login, LogoutButton, RequireAuth, Signup};
use crate::certificates::PendingCertificates;
use crate::courses::{CourseDetail, CourseList, CourseSearch, CreateCourse};
use crate::modules::{AddContent, AddModule, ContentView, EditModule, ModuleDetail};
use crate::profile::{BecomeTeacher, DashboardPage, EditProfile, Profile};

/// Whole single-page app. Screens behind `RequireAuth` redirect to
/// `/login` when no token is stored.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <AuthProvider>
            <Router>
                <div class="learnhub-app">
                    <NavBar />
                    <main>
                        <Routes fallback=|| view! { <p>"Page not found."</p> }>
                            <Route path=path!("/") view=|| view! { <Redirect path="/courses" /> } />
                            <Route path=path!("/login") view=Login />
                            <Route path=path!("/signup") view=Signup />
                            <Route path=path!("/courses") view=CourseList />
                            <Route path=path!("/search") view=CourseSearch />
                            <Route path=path!("/courses/new") view=|| view! { <RequireAuth><CreateCourse /></RequireAuth> } />
                            <Route path=path!("/courses/:slug") view=CourseDetail />
                            <Route path=path!("/courses/:slug/add-module") view=|| view! { <RequireAuth><AddModule /></RequireAuth> } />
                            <Route
                                path=path!("/courses/:course_slug/modules/:module_slug/add-content")
                                view=|| view! { <RequireAuth><AddContent /></RequireAuth> }
                            />
                            <Route path=path!("/modules/:slug") view=ModuleDetail />
                            <Route path=path!("/modules/:slug/edit") view=|| view! { <RequireAuth><EditModule /></RequireAuth> } />
                            <Route path=path!("/module-contents/:id") view=ContentView />
                            <Route
                                path=path!("/module/:module_slug/assignment/:assignment_id")
                                view=|| view! { <RequireAuth><AssignmentPanel /></RequireAuth> }
                            />
                            <Route path=path!("/dashboard") view=|| view! { <RequireAuth><DashboardPage /></RequireAuth> } />
                            <Route path=path!("/profile") view=|| view! { <RequireAuth><Profile /></RequireAuth> } />
                            <Route path=path!("/edit_profile") view=|| view! { <RequireAuth><EditProfile /></RequireAuth> } />
                            <Route path=path!("/become-teacher") view=|| view! { <RequireAuth><BecomeTeacher /></RequireAuth> } />
                            <Route path=path!("/admin") view=|| view! { <RequireAuth><AdminPanel /></RequireAuth> } />
                            <Route
                                path=path!("/certificates/pending")
                                view=|| view! { <RequireAuth><PendingCertificates /></RequireAuth> }
                            />
                        </Routes>
                    </main>
                </div>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let auth = expect_context::<AuthState>();

    view! {
        <nav class="learnhub-nav">
            <A href="/courses" attr:class="learnhub-brand">"LearnHub"</A>
            <A href="/courses">"Courses"</A>
            <A href="/search">"Search"</A>
            <Show
                when=move || auth.is_logged_in()
                fallback=|| view! {
                    <A href="/login">"Login"</A>
                    <A href="/signup">"Sign up"</A>
                }
            >
                <A href="/dashboard">"Dashboard"</A>
                <A href="/profile">
                    {move || auth.username.get().unwrap_or_else(|| "Profile".into())}
                </A>
                <LogoutButton />
            </Show>
        </nav>
    }
}
