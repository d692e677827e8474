//! Parameter maps passed to and returned from the mapper.
//!
//! Route values are strings, but any key may also be explicitly null:
//! a null `id` in a match result means "the route allows an id but none was
//! given", and a null in generation arguments means "forget the remembered
//! value for this key". [`Params`] keeps that distinction with
//! `Option<String>` values, and the [`params!`](crate::params) macro builds
//! one from literal pairs.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// An ordered map of route parameter names to (possibly null) values.
pub type Params = BTreeMap<String, Option<String>>;

/// A value that can be stored in [`Params`].
///
/// Implemented for string types, integers, and `Option` of either, so
/// that `params!{"id" => 10, "action" => None::<&str>}` reads naturally.
pub trait ParamValue {
    /// Converts the value into a parameter slot.
    fn into_param(self) -> Option<String>;
}

impl ParamValue for &str {
    fn into_param(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl ParamValue for String {
    fn into_param(self) -> Option<String> {
        Some(self)
    }
}

impl ParamValue for &String {
    fn into_param(self) -> Option<String> {
        Some(self.clone())
    }
}

impl<T: ParamValue> ParamValue for Option<T> {
    fn into_param(self) -> Option<String> {
        self.and_then(ParamValue::into_param)
    }
}

macro_rules! impl_param_value_for_int {
    ($($ty:ty),+) => {
        $(
            impl ParamValue for $ty {
                fn into_param(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )+
    };
}

impl_param_value_for_int!(i32, i64, u16, u32, u64, usize);

/// Builds a [`Params`] map from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use routes_rs_http::params;
///
/// let p = params! {"controller" => "blog", "year" => 2004, "id" => None::<&str>};
/// assert_eq!(p["controller"].as_deref(), Some("blog"));
/// assert_eq!(p["year"].as_deref(), Some("2004"));
/// assert_eq!(p["id"], None);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::urls::params::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::urls::params::Params::new();
        $(
            map.insert(
                ::std::string::ToString::to_string(&$key),
                $crate::urls::params::ParamValue::into_param($value),
            );
        )+
        map
    }};
}

/// Returns the value for `key` when it is present and not null.
pub(crate) fn value<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Option::as_deref)
}

/// Returns `true` when `key` holds a non-empty value.
pub(crate) fn has_value(params: &Params, key: &str) -> bool {
    value(params, key).is_some_and(|v| !v.is_empty())
}

/// Loose equality for parameter slots: null and the empty string compare equal.
pub(crate) fn loosely_equal(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or_default() == b.unwrap_or_default()
}

/// Interprets a flag-like parameter such as `qualified`.
///
/// Null, empty, `"0"` and `"false"` are false; anything else is true.
pub(crate) fn is_truthy(value: Option<&str>) -> bool {
    !matches!(value, None | Some("" | "0" | "false"))
}

/// Percent-encodes a path value the way form data is encoded, but keeps `/`.
///
/// Spaces become `+`; reserved characters such as `&` become `%26`.
pub(crate) fn url_quote(value: &str) -> String {
    url_quote_segment(value).replace("%2F", "/")
}

/// Percent-encodes a single path segment value, `/` included.
pub(crate) fn url_quote_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Decodes a captured path value: `+` is a space and `%XX` escapes are expanded.
pub(crate) fn url_unquote(value: &str) -> String {
    let spaced = value.replace('+', " ");
    percent_encoding::percent_decode_str(&spaced)
        .decode_utf8_lossy()
        .into_owned()
}

/// Builds a form-encoded query string from the non-null entries, in key order.
pub(crate) fn query_string(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}
