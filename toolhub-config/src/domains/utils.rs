//! Default value helpers for serde

pub fn default_true() -> bool {
    true
}

pub fn default_locale() -> String {
    "en".to_string()
}
