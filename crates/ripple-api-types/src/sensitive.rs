use serde::{Deserialize, Serialize};

/// A transparent wrapper that keeps its inner value out of `Debug`
/// output. Credentials and user-submitted content go through request
/// logs wrapped in this type.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl From<&str> for Sensitive<String> {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<T> std::ops::Deref for Sensitive<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let secret = Sensitive::new("hunter2".to_string());
        assert_eq!(format!("{secret:?}"), "<redacted>");
    }

    #[test]
    fn serde_is_transparent() {
        let secret = Sensitive::new("hunter2".to_string());
        let value = serde_json::to_value(&secret).unwrap();
        assert_eq!(value, serde_json::json!("hunter2"));

        let back: Sensitive<String> = serde_json::from_value(value).unwrap();
        assert_eq!(back.value(), "hunter2");
    }
}
