use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderNote {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub customer_note: bool,
}

impl OrderNote {
    pub fn contains(&self, marker: &str) -> bool {
        self.note.contains(marker)
    }
}
