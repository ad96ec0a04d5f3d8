use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The singleton settings row; `id` is always 1.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoreSettings {
    pub id: i32,
    pub store_name: String,
    pub store_logo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub store_logo: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.store_name.is_none() && self.store_logo.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_detects_presence() {
        assert!(SettingsPatch::default().is_empty());
        let p: SettingsPatch =
            serde_json::from_value(serde_json::json!({ "store_name": "Toko Dede" })).unwrap();
        assert!(!p.is_empty());
    }
}
