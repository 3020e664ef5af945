use super::result::ValidationResult;
use crate::error::{require_non_empty, Result};
use crate::matcher::{Actual, SharedMatcher};
use crate::response::Response;
use serde_json::Value;

/// Asserts on the value of a cookie set by the response.
#[derive(Debug, Clone)]
pub struct CookieAssertion {
    name: String,
    matcher: SharedMatcher,
}

impl CookieAssertion {
    pub fn new(name: impl Into<String>, matcher: SharedMatcher) -> Result<Self> {
        let name = name.into();
        require_non_empty(&name, "Cookie name")?;
        Ok(Self { name, matcher })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self, response: &Response) -> ValidationResult {
        let cookies = response.cookies();
        if cookies.is_empty() {
            return ValidationResult::failure("No cookies defined in the response\n");
        }
        let Some(cookie) = cookies.get(&self.name) else {
            return ValidationResult::failure(format!(
                "Cookie \"{}\" was not defined in the response. Cookies are: \n{}\n",
                self.name, cookies
            ));
        };

        let null = Value::Null;
        let actual = match cookie.value() {
            Some(value) => Actual::Text(value),
            None => Actual::Value(&null),
        };
        if self.matcher.matches(&actual) {
            return ValidationResult::success();
        }
        ValidationResult::failure(format!(
            "Expected cookie \"{}\" was not {}, {}.\n",
            self.name,
            self.matcher.describe_expectation(),
            self.matcher.describe_mismatch(&actual)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{contains_string, equal_to, null_value};
    use bytes::Bytes;

    fn response(set_cookies: &[&str]) -> Response {
        let mut builder = http::Response::builder().status(200);
        for header in set_cookies {
            builder = builder.header("Set-Cookie", *header);
        }
        builder.body(Bytes::new()).unwrap().into()
    }

    const DEVICE: &str =
        "DEVICE_ID=123; Domain=.test.com; Expires=Thu, 12-Oct-2023 09:34:31 GMT; Path=/; Secure; HttpOnly;";

    #[test]
    fn test_matching_cookie() {
        let assertion = CookieAssertion::new("DEVICE_ID", equal_to("123")).unwrap();
        assert!(assertion.validate(&response(&[DEVICE])).success);
    }

    #[test]
    fn test_mismatch_message() {
        let assertion = CookieAssertion::new("DEVICE_ID", contains_string("X")).unwrap();
        let result = assertion.validate(&response(&[DEVICE]));
        assert!(!result.success);
        assert_eq!(
            result.error_message,
            "Expected cookie \"DEVICE_ID\" was not a string containing \"X\", was \"123\".\n"
        );
    }

    #[test]
    fn test_no_cookies() {
        let assertion = CookieAssertion::new("DEVICE_ID", equal_to("123")).unwrap();
        assert_eq!(
            assertion.validate(&response(&[])).error_message,
            "No cookies defined in the response\n"
        );
    }

    #[test]
    fn test_undefined_cookie_lists_cookies() {
        let assertion = CookieAssertion::new("other", equal_to("1")).unwrap();
        let result = assertion.validate(&response(&["theme=dark"]));
        assert_eq!(
            result.error_message,
            "Cookie \"other\" was not defined in the response. Cookies are: \ntheme=dark\n"
        );
    }

    #[test]
    fn test_cookie_without_value() {
        let assertion = CookieAssertion::new("flag", null_value()).unwrap();
        assert!(assertion.validate(&response(&["flag"])).success);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(CookieAssertion::new(" ", equal_to("x")).is_err());
    }
}
