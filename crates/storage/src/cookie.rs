//! Cookie-backed shape storage.
//!
//! The document is kept in a single cookie named `shapes`. Its value is
//! escaped with the same alphabet as JavaScript's `escape()`, so cookies
//! written by browser builds of the overlay stay readable.

use chrono::{DateTime, Duration, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::cell::RefCell;
use std::rc::Rc;

use crate::StorageError;

pub const COOKIE_NAME: &str = "shapes";

/// Characters `escape()` leaves alone: ASCII alphanumerics and `@*_+-./`.
const ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'*')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Escape a cookie value.
pub fn escape(value: &str) -> String {
    utf8_percent_encode(value, ESCAPE_SET).to_string()
}

/// Reverse [`escape`].
///
/// Also accepts the `%uXXXX` form browsers emit for non Latin-1 characters.
/// Byte sequences that are not UTF-8 are read as Latin-1, which is how
/// `unescape()` treats single `%XX` escapes.
pub fn unescape(value: &str) -> Result<String, StorageError> {
    let expanded = expand_unicode_escapes(value)?;
    let bytes: Vec<u8> = percent_decode_str(&expanded).collect();
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => Ok(e.into_bytes().into_iter().map(char::from).collect()),
    }
}

fn expand_unicode_escapes(value: &str) -> Result<String, StorageError> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find("%u") {
        out.push_str(&rest[..pos]);
        let unit = unicode_escape(&rest[pos..])?;
        rest = &rest[pos + 6..];

        // Characters outside the BMP arrive as a UTF-16 surrogate pair.
        let ch = if (0xD800..0xDC00).contains(&unit) {
            match rest.get(..6).and_then(|next| unicode_escape(next).ok()) {
                Some(low) if (0xDC00..0xE000).contains(&low) => {
                    rest = &rest[6..];
                    char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
                }
                _ => None,
            }
        } else {
            char::from_u32(unit)
        };
        let ch = ch.unwrap_or(char::REPLACEMENT_CHARACTER);

        // Re-encode so a literal '%' produced here is not decoded twice.
        out.push_str(&utf8_percent_encode(ch.encode_utf8(&mut [0; 4]), ESCAPE_SET).to_string());
    }
    out.push_str(rest);
    Ok(out)
}

/// Read the code unit of a `%uXXXX` escape at the start of `text`.
fn unicode_escape(text: &str) -> Result<u32, StorageError> {
    text.get(2..6)
        .filter(|hex| text.starts_with("%u") && hex.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .ok_or_else(|| StorageError::Cookie(format!("bad unicode escape near \"{}\"", text)))
}

/// Build the `name=value; expires=...` line written to the jar.
fn cookie_line(name: &str, value: &str, expires: DateTime<Utc>) -> String {
    format!(
        "{}={}; expires={}",
        name,
        escape(value),
        expires.format(EXPIRES_FORMAT)
    )
}

/// Find a cookie's raw value in a `document.cookie` style header.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then_some(value)
    })
}

/// The host's cookie storage, seen the way a page sees `document.cookie`.
pub trait CookieJar {
    /// Every live cookie as `name=value` pairs joined by `; `.
    fn cookies(&self) -> String;

    /// Store one cookie line: `name=value` followed by `; attribute` pairs.
    fn set_cookie(&mut self, line: &str);
}

#[derive(Debug, Clone, PartialEq)]
struct StoredCookie {
    name: String,
    value: String,
    expires: Option<DateTime<Utc>>,
}

/// In-process cookie jar with `document.cookie` semantics.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Vec<StoredCookie>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookies that have not expired at `now`.
    pub fn cookies_at(&self, now: DateTime<Utc>) -> String {
        self.cookies
            .iter()
            .filter(|c| c.expires.map_or(true, |expires| expires > now))
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn expiry(&self, name: &str) -> Option<DateTime<Utc>> {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.expires)
    }
}

impl CookieJar for MemoryCookieJar {
    fn cookies(&self) -> String {
        self.cookies_at(Utc::now())
    }

    fn set_cookie(&mut self, line: &str) {
        let mut parts = line.split(';');
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            log::warn!("Ignoring malformed cookie: {}", line);
            return;
        };

        let expires = parts
            .filter_map(|attr| attr.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("expires"))
            .and_then(|(_, date)| DateTime::parse_from_rfc2822(date.trim()).ok())
            .map(|date| date.with_timezone(&Utc));

        let cookie = StoredCookie {
            name: name.trim().to_string(),
            value: value.to_string(),
            expires,
        };
        match self.cookies.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => *existing = cookie,
            None => self.cookies.push(cookie),
        }
    }
}

/// Shape storage in a single cookie.
#[derive(Clone)]
pub struct CookieStore {
    jar: Rc<RefCell<dyn CookieJar>>,
    name: String,
    lifetime: Duration,
}

impl CookieStore {
    pub fn new(jar: Rc<RefCell<dyn CookieJar>>) -> Self {
        Self {
            jar,
            name: COOKIE_NAME.to_string(),
            lifetime: Duration::days(365),
        }
    }

    /// A store over a fresh in-memory jar. The jar is returned for inspection.
    pub fn in_memory() -> (Self, Rc<RefCell<MemoryCookieJar>>) {
        let jar = Rc::new(RefCell::new(MemoryCookieJar::new()));
        (Self::new(jar.clone()), jar)
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn save(&self, json: &str) {
        self.save_at(json, Utc::now());
    }

    pub fn save_at(&self, json: &str, now: DateTime<Utc>) {
        let line = self.line_at(json, now);
        self.jar.borrow_mut().set_cookie(&line);
    }

    /// The cookie line [`Self::save`] would write for `json`.
    pub fn line(&self, json: &str) -> String {
        self.line_at(json, Utc::now())
    }

    pub fn line_at(&self, json: &str, now: DateTime<Utc>) -> String {
        cookie_line(&self.name, json, now + self.lifetime)
    }

    /// The stored document, or `None` when no cookie is set.
    pub fn load(&self) -> Result<Option<String>, StorageError> {
        let header = self.jar.borrow().cookies();
        match find_cookie(&header, &self.name) {
            Some(value) => unescape(value).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for CookieStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieStore")
            .field("name", &self.name)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
