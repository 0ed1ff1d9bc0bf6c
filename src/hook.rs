//! Registration hook names.
//!
//! A server's registration surface is a finite set of named entry points:
//! two unrouted stages that take only handlers, and one routed entry point
//! per HTTP method, which takes a route spec first. [`Hook::all`] is the
//! table the configurator walks.

use std::fmt;

use crate::method::Method;

/// An unrouted registration stage.
///
/// `Pre` handlers run before routing; `Use` handlers run for every request
/// regardless of path.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    Pre,
    Use,
}

impl Stage {
    /// The hook name as registration surfaces spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Use => "use",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named handler-registration entry point on a server.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Hook {
    /// Unrouted: takes only an ordered list of handlers.
    Stage(Stage),
    /// Routed: takes a route spec followed by an ordered list of handlers.
    Verb(Method),
}

impl Hook {
    /// The full hook table, unrouted stages first, then one hook per
    /// method in [`Method::ALL`].
    pub fn all() -> impl Iterator<Item = Hook> {
        [Hook::Stage(Stage::Pre), Hook::Stage(Stage::Use)]
            .into_iter()
            .chain(Method::ALL.iter().copied().map(Hook::Verb))
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage(stage) => f.write_str(stage.as_str()),
            Self::Verb(method) => f.write_str(method.as_lower()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Hook, Stage};
    use crate::method::Method;

    #[test]
    fn table_lists_stages_then_verbs() {
        let hooks: Vec<Hook> = Hook::all().collect();
        assert_eq!(hooks.len(), 2 + Method::ALL.len());
        assert_eq!(hooks[0], Hook::Stage(Stage::Pre));
        assert_eq!(hooks[1], Hook::Stage(Stage::Use));
        assert!(hooks[2..].iter().all(|h| matches!(h, Hook::Verb(_))));
    }

    #[test]
    fn hooks_display_as_registration_names() {
        assert_eq!(Hook::Stage(Stage::Pre).to_string(), "pre");
        assert_eq!(Hook::Stage(Stage::Use).to_string(), "use");
        assert_eq!(Hook::Verb(Method::Get).to_string(), "get");
    }
}
