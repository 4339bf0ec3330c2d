//! # `hutt://` URLs
//!
//! Turns the text the OS hands us into a [`HuttUrl`], and back again.
//!
//! ```text
//! hutt://message/<id>                      →  Message { id }
//! hutt://thread/<id>                       →  Thread { id }
//! hutt://search/<percent-encoded query>    →  Search { query }
//! hutt://compose?to=<enc>&subject=<enc>    →  Compose { to, subject }
//! hutt://<anything else>                   →  Message { id: <anything else> }
//! ```
//!
//! Parsing is total: there is no "invalid URL". A link that matches none of
//! the known prefixes still opens *something*: the remainder is taken as a
//! message id, exactly as written.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// URL scheme registered with the OS.
pub const SCHEME: &str = "hutt";

/// Everything except RFC 3986 unreserved characters gets escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// What a `hutt://` link asks the running instance to open.
///
/// Serializes with a `kind` discriminant so it can sit inside the
/// [`IpcCommand`](super::command::IpcCommand) envelope as one flat object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum HuttUrl {
    Message { id: String },
    Thread { id: String },
    /// Already percent-decoded.
    Search { query: String },
    Compose { to: String, subject: String },
}

impl HuttUrl {
    /// Compiles the part of a URL after `hutt://`.
    ///
    /// Prefixes are tried most specific first; ids are taken verbatim,
    /// search queries and compose fields are percent-decoded.
    pub fn parse(rest: &str) -> HuttUrl {
        if let Some(id) = rest.strip_prefix("message/") {
            return HuttUrl::Message { id: id.to_string() };
        }

        if let Some(id) = rest.strip_prefix("thread/") {
            return HuttUrl::Thread { id: id.to_string() };
        }

        if let Some(encoded) = rest.strip_prefix("search/") {
            return HuttUrl::Search {
                query: decode_component(encoded).into_owned(),
            };
        }

        if let Some(query_string) = rest.strip_prefix("compose?") {
            return HuttUrl::Compose {
                to: query_param(query_string, "to").unwrap_or_default(),
                subject: query_param(query_string, "subject").unwrap_or_default(),
            };
        }

        HuttUrl::Message {
            id: rest.to_string(),
        }
    }
}

/// Formats the canonical `hutt://` URL for this target.
impl fmt::Display for HuttUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HuttUrl::Message { id } => write!(f, "{SCHEME}://message/{id}"),
            HuttUrl::Thread { id } => write!(f, "{SCHEME}://thread/{id}"),
            HuttUrl::Search { query } => write!(f, "{SCHEME}://search/{}", encode(query)),
            HuttUrl::Compose { to, subject } => write!(
                f,
                "{SCHEME}://compose?to={}&subject={}",
                encode(to),
                encode(subject)
            ),
        }
    }
}

/// Strips a leading `hutt://` (or bare `hutt:`) from `url`.
///
/// The scheme is matched case-insensitively. Input without the scheme is
/// returned untouched, so `message/abc` and `hutt://message/abc` compile the same.
pub fn strip_scheme(url: &str) -> &str {
    let Some(head) = url.get(..SCHEME.len() + 1) else {
        return url;
    };
    if !head.ends_with(':') || !head[..SCHEME.len()].eq_ignore_ascii_case(SCHEME) {
        return url;
    }
    let rest = &url[SCHEME.len() + 1..];
    rest.strip_prefix("//").unwrap_or(rest)
}

/// Query-string decoding: `+` is a space, `%XX` is a byte.
///
/// Malformed escapes (`%zz`, a trailing `%`) pass through literally and
/// invalid UTF-8 is replaced rather than rejected.
fn decode_component(s: &str) -> Cow<'_, str> {
    if s.contains('+') {
        let spaced = s.replace('+', " ");
        Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
    } else {
        percent_decode_str(s).decode_utf8_lossy()
    }
}

/// First value for `key` in a `k=v&k=v` query string, decoded.
fn query_param(query_string: &str, key: &str) -> Option<String> {
    query_string
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| decode_component(k) == key)
        .map(|(_, v)| decode_component(v).into_owned())
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}
