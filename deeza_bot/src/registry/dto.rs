use serde::{Deserialize, Serialize};

/// A chat identity and, once registered, its wallet. Users are created on
/// first contact and never deleted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub chat_id: i64,
    pub handle: Option<String>,
    pub display_name: String,
    pub wallet_address: Option<String>,
}

impl User {
    pub fn wallet(&self) -> Option<&str> {
        self.wallet_address.as_deref()
    }
}
