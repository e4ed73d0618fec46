use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub line1: String,
    pub city: String,
    pub postal_code: String,
}

impl Address {
    /// Single-line rendering used by the job views.
    pub fn display(&self) -> String {
        format!("{}, {} {}", self.line1, self.postal_code, self.city)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
}
