use crate::domain::routes::{find_by_name, find_by_path};
use crate::domain::{Layout, RouteDescriptor, RouteMeta, ViewKey};

// Route names, so callers never hard-code the strings.
pub mod names {
    pub const LOGIN: &str = "login";
    pub const HOME: &str = "home";
    pub const INTERVIEW: &str = "interview";
    pub const INTERVIEWEE: &str = "interviewee";
    pub const INTERVIEWER: &str = "interviewer";
    pub const CREATE: &str = "create";
    pub const RESULT: &str = "result";
    pub const SCORE: &str = "score";
}

pub mod paths {
    pub const LOGIN: &str = "/";
    pub const HOME: &str = "/home";
    pub const INTERVIEW: &str = "/interview";
    pub const INTERVIEWEE: &str = "/interviewee";
    pub const INTERVIEWER: &str = "/interviewer";
    pub const CREATE: &str = "/create";
    pub const RESULT: &str = "/result";
    pub const SCORE: &str = "/score";
}

const fn route(
    path: &'static str,
    name: &'static str,
    view: ViewKey,
    title: &'static str,
    requires_auth: bool,
) -> RouteDescriptor {
    RouteDescriptor {
        path,
        name,
        view,
        meta: RouteMeta {
            title: Some(title),
            requires_auth,
            layout: Layout::Default,
        },
    }
}

// Ordered route table; the first matching path wins.
pub static ROUTES: [RouteDescriptor; 8] = [
    route(paths::LOGIN, names::LOGIN, ViewKey::LoginPage, "Login", false),
    route(paths::HOME, names::HOME, ViewKey::HomePage, "Home", true),
    route(
        paths::INTERVIEW,
        names::INTERVIEW,
        ViewKey::InterviewPage,
        "Interview",
        true,
    ),
    route(
        paths::INTERVIEWEE,
        names::INTERVIEWEE,
        ViewKey::IntervieweePage,
        "Interviewee",
        true,
    ),
    route(
        paths::INTERVIEWER,
        names::INTERVIEWER,
        ViewKey::InterviewerPage,
        "Interviewer",
        true,
    ),
    route(
        paths::CREATE,
        names::CREATE,
        ViewKey::CreateInterviewPage,
        "Create Interview",
        true,
    ),
    route(
        paths::RESULT,
        names::RESULT,
        ViewKey::InterviewResultPage,
        "Interview Result",
        true,
    ),
    route(paths::SCORE, names::SCORE, ViewKey::ScorePage, "Scoring", true),
];

pub fn auth_required_routes() -> impl Iterator<Item = &'static RouteDescriptor> {
    ROUTES.iter().filter(|route| route.meta.requires_auth)
}

pub fn route_by_name(name: &str) -> Option<&'static RouteDescriptor> {
    find_by_name(&ROUTES, name)
}

// Ignores the query string and a trailing slash, like the router.
pub fn route_by_path(path: &str) -> Option<&'static RouteDescriptor> {
    find_by_path(&ROUTES, path)
}
