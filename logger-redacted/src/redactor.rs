use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Option<Regex> =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").ok();
    static ref PHONE_REGEX: Option<Regex> =
        Regex::new(r"(?:\+?91[-\s]?)?\b[6-9]\d{9}\b").ok();
}

/// Query parameters whose values are always masked in full.
const SENSITIVE_QUERY_KEYS: [&str; 6] = [
    "contactnumber",
    "mobilenumber",
    "password",
    "oldpassword",
    "newpassword",
    "forgetpasswordkey",
];

const MASK: &str = "***";

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_query_values: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_query_values: true,
        }
    }
}

/// PII redactor for log messages and request URIs
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_emails {
            result = redact_emails(&result);
        }

        if self.config.redact_phones {
            result = redact_phones(&result);
        }

        result
    }

    /// Redact a `path?query` string for request logging.
    pub fn redact_uri(&self, uri: &str) -> String {
        let Some((path, query)) = uri.split_once('?') else {
            return self.redact(uri);
        };

        if !self.config.redact_query_values {
            return self.redact(uri);
        }

        let query = query
            .split('&')
            .map(|pair| match pair.split_once('=') {
                Some((key, _)) if is_sensitive_key(key) => format!("{key}={MASK}"),
                _ => pair.to_string(),
            })
            .collect::<Vec<_>>()
            .join("&");

        self.redact(&format!("{path}?{query}"))
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SENSITIVE_QUERY_KEYS.contains(&key.as_str())
}

fn redact_emails(text: &str) -> String {
    let Some(regex) = EMAIL_REGEX.as_ref() else {
        return text.to_string();
    };
    regex
        .replace_all(text, |caps: &regex::Captures| {
            let email = caps.get(0).map_or("", |m| m.as_str());
            match email.split_once('@') {
                Some((local, domain)) => {
                    let first: String = local.chars().take(1).collect();
                    format!("{first}{MASK}@{domain}")
                }
                None => format!("{MASK}@{MASK}"),
            }
        })
        .to_string()
}

fn redact_phones(text: &str) -> String {
    let Some(regex) = PHONE_REGEX.as_ref() else {
        return text.to_string();
    };
    regex
        .replace_all(text, |caps: &regex::Captures| {
            let phone = caps.get(0).map_or("", |m| m.as_str());
            let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
            let tail: String = digits.iter().skip(digits.len().saturating_sub(4)).collect();
            format!("******{tail}")
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_redaction() {
        let redactor = PiiRedactor::default();

        let redacted = redactor.redact("Lead for asha.rao@example.com created");
        assert_eq!(redacted, "Lead for a***@example.com created");
    }

    #[test]
    fn test_phone_redaction() {
        let redactor = PiiRedactor::default();

        assert_eq!(redactor.redact("call 9876543210"), "call ******3210");
        assert_eq!(redactor.redact("call +91 9876543210"), "call ******3210");
    }

    #[test]
    fn test_non_phone_numbers_untouched() {
        let redactor = PiiRedactor::default();

        assert_eq!(redactor.redact("lead 1234 page 2"), "lead 1234 page 2");
        assert_eq!(redactor.redact("pincode 560001"), "pincode 560001");
    }

    #[test]
    fn test_uri_query_values_masked() {
        let redactor = PiiRedactor::default();

        let redacted =
            redactor.redact_uri("/api/v1/login/profile?mobileNumber=9876543210&userId=7");
        assert_eq!(redacted, "/api/v1/login/profile?mobileNumber=***&userId=7");

        let redacted = redactor.redact_uri("/api/v1/clients/contact?ContactNumber=123");
        assert_eq!(redacted, "/api/v1/clients/contact?ContactNumber=***");
    }

    #[test]
    fn test_uri_without_query() {
        let redactor = PiiRedactor::default();
        assert_eq!(redactor.redact_uri("/api/v1/leads/42"), "/api/v1/leads/42");
    }

    #[test]
    fn test_disabled_redaction() {
        let redactor = PiiRedactor::new(RedactionConfig {
            redact_emails: false,
            redact_phones: false,
            redact_query_values: false,
        });

        let text = "/x?mobileNumber=9876543210&email=a@b.io";
        assert_eq!(redactor.redact_uri(text), text);
    }
}
