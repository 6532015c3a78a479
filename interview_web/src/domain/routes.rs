use url::form_urlencoded;

// Lazily mounted view a route renders; the hosting shell maps keys to components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    LoginPage,
    HomePage,
    InterviewPage,
    IntervieweePage,
    InterviewerPage,
    CreateInterviewPage,
    InterviewResultPage,
    ScorePage,
}

// Page chrome a view is rendered inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    #[default]
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: Option<&'static str>,
    pub requires_auth: bool,
    pub layout: Layout,
}

// Static declaration binding a path and unique name to a view and access metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub view: ViewKey,
    pub meta: RouteMeta,
}

// Where a navigation wants to go: a raw path (optionally with a query) or a named route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Path(String),
    Named {
        name: String,
        query: Vec<(String, String)>,
    },
}

impl NavigationTarget {
    pub fn path(path: impl Into<String>) -> Self {
        NavigationTarget::Path(path.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        NavigationTarget::Named {
            name: name.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            NavigationTarget::Named { name, mut query } => {
                query.push((key.into(), value.into()));
                NavigationTarget::Named { name, query }
            }
            NavigationTarget::Path(path) => {
                let pairs: [(String, String); 1] = [(key.into(), value.into())];
                let pair = encode_query(&pairs);
                let separator = if path.contains('?') { '&' } else { '?' };
                NavigationTarget::Path(format!("{path}{separator}{pair}"))
            }
        }
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        NavigationTarget::path(path)
    }
}

// Outcome of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub route: &'static RouteDescriptor,
    pub query: Vec<(String, String)>,
    pub full_path: String,
    pub redirected: bool,
}

impl Resolution {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// Drops the query string and any trailing slash; the root stays "/".
pub fn normalize_path(path: &str) -> &str {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    match path.trim_end_matches('/') {
        "" if path.starts_with('/') => "/",
        trimmed => trimmed,
    }
}

// First route in `table` whose path matches after normalization.
pub fn find_by_path(
    table: &'static [RouteDescriptor],
    path: &str,
) -> Option<&'static RouteDescriptor> {
    let path = normalize_path(path);
    table.iter().find(|route| route.path == path)
}

pub fn find_by_name(
    table: &'static [RouteDescriptor],
    name: &str,
) -> Option<&'static RouteDescriptor> {
    table.iter().find(|route| route.name == name)
}

pub fn encode_query(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

pub fn decode_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

// Joins a path and query into the full location string.
pub fn full_path(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", encode_query(query))
    }
}
