//! Cookie model, `Set-Cookie` parsing and the cookie jar.
//!
//! # Module Structure
//!
//! - `types` - `Cookie`, its builder and the ordered `Cookies` collection
//! - `origin` - Request origin and domain/path visibility rules
//! - `parse` - Lenient `Set-Cookie` parsing
//! - `store` - Thread-safe cookie storage
//! - `filter` - The jar as a chain filter

mod filter;
mod origin;
mod parse;
mod store;
mod types;

pub use filter::CookieFilter;
pub use origin::{domain_matches, path_matches, CookieOrigin, DEFAULT_PORT};
pub use parse::{parse_expires, parse_set_cookie, CookieParseError};
pub use store::{CookieStore, InMemoryCookieStore};
pub use types::{Cookie, CookieBuilder, Cookies, UNDEFINED_VERSION};
