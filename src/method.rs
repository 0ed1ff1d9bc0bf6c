//! HTTP method as a typed enum.
//!
//! Covers RFC 9110 standard methods, WebDAV extensions (RFC 4918 / 4791 /
//! 3253 / 5323), and `PURGE` used by nginx and Varnish for cache
//! invalidation.
//!
//! [`Method::ALL`] is the routed half of the registration hook table: one
//! registration hook exists per method listed here, and a server advertises
//! the subset it actually implements through
//! [`Registry::supports`](crate::Registry::supports). Most servers support
//! a handful; the rest are skipped at registration time.

use std::fmt;
use std::str::FromStr;

/// Generates the enum plus its wire / hook-name tables from one list, so
/// the four representations cannot drift apart.
macro_rules! methods {
    ($($(#[$meta:meta])* $variant:ident => $upper:literal / $lower:literal,)+) => {
        /// A known HTTP method.
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum Method {
            $($(#[$meta])* $variant,)+
        }

        impl Method {
            /// Every method this crate can wire a routed registration hook
            /// for, in table order.
            pub const ALL: &'static [Method] = &[$(Method::$variant),+];

            /// The uppercase wire representation (e.g. `"GET"`).
            pub fn as_str(self) -> &'static str {
                match self { $(Self::$variant => $upper,)+ }
            }

            /// The lowercase hook name (e.g. `"get"`), as registration
            /// surfaces spell it.
            pub fn as_lower(self) -> &'static str {
                match self { $(Self::$variant => $lower,)+ }
            }
        }

        /// Parses an uppercase method string. Case-sensitive per RFC 9110 §9.1.
        impl FromStr for Method {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s { $($upper => Ok(Self::$variant),)+ _ => Err(()) }
            }
        }
    };
}

methods! {
    // RFC 9110
    Connect => "CONNECT" / "connect",
    Delete => "DELETE" / "delete",
    Get => "GET" / "get",
    Head => "HEAD" / "head",
    Options => "OPTIONS" / "options",
    Patch => "PATCH" / "patch",
    Post => "POST" / "post",
    Put => "PUT" / "put",
    Trace => "TRACE" / "trace",
    // WebDAV RFC 4918
    Copy => "COPY" / "copy",
    Lock => "LOCK" / "lock",
    Mkcol => "MKCOL" / "mkcol",
    Move => "MOVE" / "move",
    Propfind => "PROPFIND" / "propfind",
    Proppatch => "PROPPATCH" / "proppatch",
    Unlock => "UNLOCK" / "unlock",
    /// RFC 4791 — CalDAV.
    Mkcalendar => "MKCALENDAR" / "mkcalendar",
    /// RFC 3253.
    Report => "REPORT" / "report",
    /// RFC 5323.
    Search => "SEARCH" / "search",
    /// nginx / Varnish cache invalidation.
    Purge => "PURGE" / "purge",
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Method;

    #[test]
    fn wire_names_round_trip() {
        for method in Method::ALL.iter().copied() {
            assert_eq!(method.as_str().parse::<Method>(), Ok(method));
        }
    }

    #[test]
    fn hook_names_are_lowercase_wire_names() {
        for method in Method::ALL.iter().copied() {
            assert_eq!(method.as_lower(), method.as_str().to_ascii_lowercase());
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert!("get".parse::<Method>().is_err());
        assert!("FETCH".parse::<Method>().is_err());
    }
}
