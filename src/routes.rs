//! Route table of the web front end.
//!
//! Static paths always win over the `/{username}` pattern, and protected
//! routes send anonymous sessions to `/login`.

use devfolio_auth::AuthState;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Browse,
    Login,
    Register,
    Dashboard,
    Portfolio,
    Projects,
    Blog,
    Settings,
    Skills,
    Experience,
    Education,
    /// Public profile of a user
    Profile(String),
    NotFound,
}

/// What to do for a requested path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Route {
    /// Match a path against the table.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');

        match trimmed {
            "" => Route::Home,
            "browse" => Route::Browse,
            "login" => Route::Login,
            "register" => Route::Register,
            "dashboard" => Route::Dashboard,
            "portfolio" => Route::Portfolio,
            "projects" => Route::Projects,
            "blog" => Route::Blog,
            "settings" => Route::Settings,
            "skills" => Route::Skills,
            "experience" => Route::Experience,
            "education" => Route::Education,
            username if is_username(username) => Route::Profile(username.to_string()),
            _ => Route::NotFound,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Portfolio
                | Route::Projects
                | Route::Blog
                | Route::Settings
                | Route::Skills
                | Route::Experience
                | Route::Education
        )
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Browse => "/browse".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Portfolio => "/portfolio".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Blog => "/blog".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::Skills => "/skills".to_string(),
            Route::Experience => "/experience".to_string(),
            Route::Education => "/education".to_string(),
            Route::Profile(username) => format!("/{}", username),
            Route::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolve `path` for a session in `state`.
pub fn resolve(path: &str, state: AuthState) -> Navigation {
    let route = Route::parse(path);
    if route.is_protected() && !state.is_signed_in() {
        Navigation::Redirect(Route::Login)
    } else {
        Navigation::Render(route)
    }
}

// A single segment of the characters usernames may contain.
fn is_username(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | '+'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_paths_beat_username() {
        assert_eq!(Route::parse("/browse"), Route::Browse);
        assert_eq!(Route::parse("/skills/"), Route::Skills);
        assert_eq!(Route::parse("/jane"), Route::Profile("jane".into()));
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/jane?tab=blog"), Route::Profile("jane".into()));
    }

    #[test]
    fn nested_paths_are_not_found() {
        assert_eq!(Route::parse("/jane/projects"), Route::NotFound);
        assert_eq!(Route::parse("/a b"), Route::NotFound);
    }

    #[test]
    fn protected_routes_redirect_anonymous_sessions() {
        assert_eq!(
            resolve("/dashboard", AuthState::Anonymous),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            resolve("/education", AuthState::Authenticating),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            resolve("/dashboard", AuthState::Refreshing),
            Navigation::Render(Route::Dashboard)
        );
        assert_eq!(
            resolve("/jane", AuthState::Anonymous),
            Navigation::Render(Route::Profile("jane".into()))
        );
    }

    #[test]
    fn paths_round_trip() {
        for route in [Route::Home, Route::Settings, Route::Profile("jane".into())] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
