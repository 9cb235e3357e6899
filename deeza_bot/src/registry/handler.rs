use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::Result;
use sled::{Db, Tree};

use crate::registry::dto::User;

const USERS_TREE: &str = "users";
const HANDLE_INDEX_TREE: &str = "users_by_handle";

/// Chat identity <-> wallet mapping, with a lowercase-handle secondary index
/// so gift recipients can be resolved by @username.
#[derive(Clone)]
pub struct UserRegistry {
    users: Tree,
    by_handle: Tree,
}

impl UserRegistry {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let users = db.open_tree(USERS_TREE)?;
        let by_handle = db.open_tree(HANDLE_INDEX_TREE)?;
        Ok(Self { users, by_handle })
    }

    pub fn get(&self, chat_id: i64) -> Option<User> {
        self.users
            .get(chat_id.to_be_bytes())
            .ok()
            .flatten()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    pub fn get_or_create(
        &self,
        chat_id: i64,
        display_name: &str,
        handle: Option<&str>,
    ) -> Result<User> {
        if let Some(mut user) = self.get(chat_id) {
            // Handles can change between messages; keep the index current.
            let handle = handle.map(|h| h.to_lowercase());
            if handle.is_some() && user.handle != handle {
                if let Some(old) = &user.handle {
                    self.by_handle.remove(old.as_bytes())?;
                }
                user.handle = handle;
                self.put(&user)?;
            }
            return Ok(user);
        }

        let user = User {
            chat_id,
            handle: handle.map(|h| h.to_lowercase()),
            display_name: display_name.to_string(),
            wallet_address: None,
        };
        self.put(&user)?;
        Ok(user)
    }

    pub fn get_by_handle(&self, handle: &str) -> Option<User> {
        let key = handle.trim_start_matches('@').to_lowercase();
        let chat_id_bytes = self.by_handle.get(key.as_bytes()).ok().flatten()?;
        let chat_id = i64::from_be_bytes(chat_id_bytes.as_ref().try_into().ok()?);
        self.get(chat_id)
    }

    /// Persist a validated wallet address for the chat. The address must
    /// parse as an EVM address; anything else is rejected before storage.
    pub fn set_wallet(&self, chat_id: i64, address: &str) -> Result<()> {
        let parsed = Address::from_str(address)
            .map_err(|_| anyhow::anyhow!("invalid wallet address: {}", address))?;
        let mut user = self
            .get(chat_id)
            .ok_or_else(|| anyhow::anyhow!("unknown user: {}", chat_id))?;
        user.wallet_address = Some(parsed.to_string());
        self.put(&user)
    }

    fn put(&self, user: &User) -> Result<()> {
        let bytes = serde_json::to_vec(user)?;
        self.users.insert(user.chat_id.to_be_bytes(), bytes)?;
        if let Some(handle) = &user.handle {
            self.by_handle
                .insert(handle.as_bytes(), &user.chat_id.to_be_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> UserRegistry {
        let db = sled::Config::new().temporary(true).open().unwrap();
        UserRegistry::new(&db).unwrap()
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let reg = registry();
        let a = reg.get_or_create(1, "Alice", Some("Alice_W")).unwrap();
        let b = reg.get_or_create(1, "Alice", Some("alice_w")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.handle.as_deref(), Some("alice_w"));
    }

    #[test]
    fn test_handle_lookup() {
        let reg = registry();
        reg.get_or_create(42, "Bob", Some("BobTheGifted")).unwrap();
        let user = reg.get_by_handle("@bobthegifted").unwrap();
        assert_eq!(user.chat_id, 42);
        assert!(reg.get_by_handle("nobody").is_none());
    }

    #[test]
    fn test_set_wallet_validates_format() {
        let reg = registry();
        reg.get_or_create(1, "Alice", None).unwrap();
        assert!(reg.set_wallet(1, "not-an-address").is_err());
        assert!(reg.set_wallet(1, "0x1234").is_err());
        reg.set_wallet(1, "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B")
            .unwrap();
        let user = reg.get(1).unwrap();
        assert!(user.wallet_address.is_some());
    }
}
