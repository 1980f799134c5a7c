use crate::contract::model::{Quote, User};
use crate::infra::storage::entity::{quote, user};

/// Convert a database entity to a contract model
impl From<user::Model> for User {
    fn from(entity: user::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<quote::Model> for Quote {
    fn from(entity: quote::Model) -> Self {
        Self {
            id: entity.id,
            text: entity.text,
            category: entity.category,
            author: entity.author,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
