use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertUser {
    pub username: String,
    pub password: String,
}

impl InsertUser {
    pub fn with_id(self, id: String) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub complaint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertComplaint {
    pub name: String,
    pub phone: String,
    pub complaint: String,
}

impl InsertComplaint {
    pub fn with_id(self, id: String) -> Complaint {
        Complaint {
            id,
            name: self.name,
            phone: self.phone,
            complaint: self.complaint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOrder {
    pub name: String,
    pub phone: String,
    pub quantity: i64,
}

impl InsertOrder {
    pub fn with_id(self, id: String) -> Order {
        Order {
            id,
            name: self.name,
            phone: self.phone,
            quantity: self.quantity,
        }
    }
}
