use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use storefront_common::{
    Complaint, InsertComplaint, InsertOrder, InsertUser, Order, User,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::StoreError;

/// Record storage behind the intake endpoints.
///
/// Records are create-then-immutable: there is no update or delete.
/// Full-table reads return records in no particular order.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, user: InsertUser) -> Result<User, StoreError>;

    async fn create_complaint(&self, complaint: InsertComplaint) -> Result<Complaint, StoreError>;
    async fn get_complaints(&self) -> Result<Vec<Complaint>, StoreError>;

    async fn create_order(&self, order: InsertOrder) -> Result<Order, StoreError>;
    async fn get_orders(&self) -> Result<Vec<Order>, StoreError>;
}

/// Process-lifetime store. Everything is lost on restart.
///
/// Each table is keyed by a freshly generated UUIDv4 string. `usernames`
/// indexes users by name so username uniqueness is checked and claimed in a
/// single entry operation.
#[derive(Debug, Default)]
pub struct MemStorage {
    users: DashMap<String, User>,
    usernames: DashMap<String, String>,
    complaints: DashMap<String, Complaint>,
    orders: DashMap<String, Order>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Claim an unused id in `table` and store the record built from it.
fn insert_with_fresh_id<T: Clone>(table: &DashMap<String, T>, build: impl FnOnce(String) -> T) -> T {
    let slot = loop {
        if let Entry::Vacant(slot) = table.entry(Uuid::new_v4().to_string()) {
            break slot;
        }
    };
    let record = build(slot.key().clone());
    slot.insert(record).value().clone()
}

fn all<T: Clone>(table: &DashMap<String, T>) -> Vec<T> {
    table.iter().map(|entry| entry.value().clone()).collect()
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).map(|user| user.value().clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = self.usernames.get(username).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        self.get_user(&id).await
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, StoreError> {
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::UsernameTaken {
                username: user.username,
            }),
            Entry::Vacant(name_slot) => {
                let user = insert_with_fresh_id(&self.users, |id| user.with_id(id));
                name_slot.insert(user.id.clone());
                debug!(id = %user.id, "user created");
                Ok(user)
            }
        }
    }

    async fn create_complaint(&self, complaint: InsertComplaint) -> Result<Complaint, StoreError> {
        let complaint = insert_with_fresh_id(&self.complaints, |id| complaint.with_id(id));
        debug!(id = %complaint.id, "complaint stored");
        Ok(complaint)
    }

    async fn get_complaints(&self) -> Result<Vec<Complaint>, StoreError> {
        Ok(all(&self.complaints))
    }

    async fn create_order(&self, order: InsertOrder) -> Result<Order, StoreError> {
        let order = insert_with_fresh_id(&self.orders, |id| order.with_id(id));
        debug!(id = %order.id, quantity = order.quantity, "order stored");
        Ok(order)
    }

    async fn get_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(all(&self.orders))
    }
}
