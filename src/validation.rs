// Attribute constraint checks run before a manifest is read.
//
// Shape errors (missing required fields, values outside an enum) are rejected
// by serde while the config is deserialized. Everything else is checked here.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;

const DNS1123_LABEL_MAX_LENGTH: usize = 63;
const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;
const QUALIFIED_NAME_MAX_LENGTH: usize = 63;
const LABEL_VALUE_MAX_LENGTH: usize = 63;
const TOTAL_ANNOTATION_SIZE_LIMIT: usize = 256 * 1024;

static DNS1123_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"));
static DNS1123_SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$").expect("valid regex")
});
static QUALIFIED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]$").expect("valid regex"));

/// Implemented by every config node that carries constraints of its own or
/// below it.
pub trait Validate {
    fn validate(&self, v: &mut Validator);
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self, v: &mut Validator) {
        if let Some(inner) = self {
            inner.validate(v);
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self, v: &mut Validator) {
        for (i, item) in self.iter().enumerate() {
            v.path.push(format!("[{i}]"));
            item.validate(v);
            v.path.pop();
        }
    }
}

/// Collects violations together with the attribute path they were found at.
#[derive(Debug, Default)]
pub struct Validator {
    path: Vec<String>,
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a nested attribute under `name`.
    pub fn field<T: Validate + ?Sized>(&mut self, name: &str, value: &T) -> &mut Self {
        self.path.push(name.to_string());
        value.validate(self);
        self.path.pop();
        self
    }

    /// Record a violation for `name` under the current path.
    pub fn error(&mut self, name: &str, msg: impl Display) {
        let location = self.location(name);
        self.errors.push(format!("{location}: {msg}"));
    }

    pub fn min_length(&mut self, name: &str, value: Option<&str>, min: usize) -> &mut Self {
        if let Some(s) = value {
            if s.chars().count() < min {
                self.error(name, format!("must be at least {min} characters"));
            }
        }
        self
    }

    pub fn max_length(&mut self, name: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(s) = value {
            if s.chars().count() > max {
                self.error(name, format!("must be at most {max} characters"));
            }
        }
        self
    }

    pub fn at_least(&mut self, name: &str, value: Option<i64>, min: i64) -> &mut Self {
        if let Some(n) = value {
            if n < min {
                self.error(name, format!("must be at least {min}, got {n}"));
            }
        }
        self
    }

    /// Object names: DNS-1123 subdomain.
    pub fn dns_subdomain(&mut self, name: &str, value: &str) -> &mut Self {
        for msg in check_dns1123_subdomain(value) {
            self.error(name, msg);
        }
        self
    }

    /// Namespaces: DNS-1123 label.
    pub fn dns_label(&mut self, name: &str, value: &str) -> &mut Self {
        for msg in check_dns1123_label(value) {
            self.error(name, msg);
        }
        self
    }

    pub fn labels(&mut self, name: &str, labels: Option<&BTreeMap<String, String>>) -> &mut Self {
        for (key, value) in labels.into_iter().flatten() {
            let location = format!("{name}[{key:?}]");
            for msg in check_qualified_name(key) {
                self.error(&location, format!("invalid key: {msg}"));
            }
            for msg in check_label_value(value) {
                self.error(&location, format!("invalid value: {msg}"));
            }
        }
        self
    }

    pub fn annotations(
        &mut self,
        name: &str,
        annotations: Option<&BTreeMap<String, String>>,
    ) -> &mut Self {
        let Some(annotations) = annotations else {
            return self;
        };
        let mut total = 0;
        for (key, value) in annotations {
            for msg in check_qualified_name(&key.to_lowercase()) {
                self.error(&format!("{name}[{key:?}]"), format!("invalid key: {msg}"));
            }
            total += key.len() + value.len();
        }
        if total > TOTAL_ANNOTATION_SIZE_LIMIT {
            self.error(
                name,
                format!("total size must be at most {TOTAL_ANNOTATION_SIZE_LIMIT} bytes, got {total}"),
            );
        }
        self
    }

    #[cfg(test)]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn finish(self) -> Result<(), Vec<String>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn location(&self, name: &str) -> String {
        let mut out = String::new();
        for segment in self.path.iter().map(String::as_str).chain(std::iter::once(name)) {
            if segment.is_empty() {
                continue;
            }
            if !out.is_empty() && !segment.starts_with('[') {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }
}

fn check_dns1123_label(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        errors.push(format!("must be no more than {DNS1123_LABEL_MAX_LENGTH} characters"));
    }
    if !DNS1123_LABEL.is_match(value) {
        errors.push(
            "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', \
             and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    errors
}

fn check_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errors.push(format!("must be no more than {DNS1123_SUBDOMAIN_MAX_LENGTH} characters"));
    }
    if !DNS1123_SUBDOMAIN.is_match(value) {
        errors.push(
            "a lowercase RFC 1123 subdomain must consist of lower case alphanumeric characters, \
             '-' or '.', and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    errors
}

fn check_qualified_name(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    let (prefix, name) = match value.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, value),
    };
    if let Some(prefix) = prefix {
        if prefix.is_empty() {
            errors.push("prefix part must be non-empty".to_string());
        } else {
            errors.extend(
                check_dns1123_subdomain(prefix)
                    .into_iter()
                    .map(|msg| format!("prefix part {msg}")),
            );
        }
    }
    if name.is_empty() {
        errors.push("name part must be non-empty".to_string());
    } else if name.len() > QUALIFIED_NAME_MAX_LENGTH {
        errors.push(format!(
            "name part must be no more than {QUALIFIED_NAME_MAX_LENGTH} characters"
        ));
    }
    if !name.is_empty() && !QUALIFIED_NAME.is_match(name) {
        errors.push(
            "name part must consist of alphanumeric characters, '-', '_' or '.', \
             and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    errors
}

fn check_label_value(value: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if value.is_empty() {
        return errors;
    }
    if value.len() > LABEL_VALUE_MAX_LENGTH {
        errors.push(format!("must be no more than {LABEL_VALUE_MAX_LENGTH} characters"));
    }
    if !QUALIFIED_NAME.is_match(value) {
        errors.push(
            "must be an empty string or consist of alphanumeric characters, '-', '_' or '.', \
             and must start and end with an alphanumeric character"
                .to_string(),
        );
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Port(Option<i64>);

    impl Validate for Port {
        fn validate(&self, v: &mut Validator) {
            v.at_least("port", self.0, 0);
        }
    }

    #[test]
    fn paths_include_parents_and_indexes() {
        let ports = vec![Port(Some(3306)), Port(Some(-1))];
        let mut v = Validator::new();
        v.field("spec", &ports);
        assert_eq!(v.errors(), ["spec[1].port: must be at least 0, got -1"]);
    }

    #[test]
    fn optional_values_are_skipped() {
        let mut v = Validator::new();
        v.min_length("name", None, 1)
            .max_length("host", None, 255)
            .at_least("replicas", None, 0)
            .field("port", &None::<Port>);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn length_bounds_count_characters() {
        let mut v = Validator::new();
        v.min_length("cron", Some(""), 1);
        v.max_length("name", Some("u".repeat(81).as_str()), 80);
        v.max_length("host", Some("%"), 255);
        let errors = v.finish().unwrap_err();
        assert_eq!(
            errors,
            vec![
                "cron: must be at least 1 characters".to_string(),
                "name: must be at most 80 characters".to_string(),
            ]
        );
    }

    #[test]
    fn dns_names() {
        assert!(check_dns1123_subdomain("mariadb-galera.backup").is_empty());
        assert!(!check_dns1123_subdomain("MariaDB").is_empty());
        assert!(!check_dns1123_subdomain(&"a".repeat(254)).is_empty());
        assert!(check_dns1123_label("default").is_empty());
        assert!(!check_dns1123_label("kube.system").is_empty());
        assert!(!check_dns1123_label("-db").is_empty());
    }

    #[test]
    fn label_keys_and_values() {
        assert!(check_qualified_name("app.kubernetes.io/name").is_empty());
        assert!(check_qualified_name("tier").is_empty());
        assert!(!check_qualified_name("/tier").is_empty());
        assert!(!check_qualified_name("Example.com/tier").is_empty());
        assert!(!check_qualified_name("tier-").is_empty());
        assert!(check_label_value("").is_empty());
        assert!(check_label_value("v1.2_3").is_empty());
        assert!(!check_label_value("has space").is_empty());
    }

    #[test]
    fn label_errors_point_at_the_key() {
        let labels = BTreeMap::from([("bad key".to_string(), "ok".to_string())]);
        let mut v = Validator::new();
        v.path.push("metadata".to_string());
        v.labels("labels", Some(&labels));
        assert_eq!(v.errors().len(), 1);
        assert!(v.errors()[0].starts_with("metadata.labels[\"bad key\"]: invalid key"));
    }

    #[test]
    fn annotations_allow_free_form_values() {
        let annotations = BTreeMap::from([(
            "kubectl.kubernetes.io/last-applied-configuration".to_string(),
            "{\"spec\": {}}".to_string(),
        )]);
        let mut v = Validator::new();
        v.annotations("annotations", Some(&annotations));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn annotations_total_size_is_bounded() {
        let annotations = BTreeMap::from([("big".to_string(), "x".repeat(256 * 1024))]);
        let mut v = Validator::new();
        v.annotations("annotations", Some(&annotations));
        let errors = v.finish().unwrap_err();
        assert!(errors[0].starts_with("annotations: total size must be at most"));
    }
}
