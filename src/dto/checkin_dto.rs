use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CheckInPayload {
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}
