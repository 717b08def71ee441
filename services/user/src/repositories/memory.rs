use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::UserRepository;
use crate::models::{NewUser, UpdateProfile, User};

/// In-memory user store for service tests
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Ok(None);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            email: new_user.email.clone(),
            address: new_user.address.clone(),
            mobile: new_user.mobile.clone(),
            date_of_birth: new_user.date_of_birth,
            password_hash: new_user.password_hash.clone(),
            addresses: new_user.addresses.clone(),
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_profile(&self, id: Uuid, update: &UpdateProfile) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(first_name) = &update.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(address) = &update.address {
            user.address = address.clone();
        }
        if let Some(mobile) = &update.mobile {
            user.mobile = mobile.clone();
        }
        if let Some(date_of_birth) = update.date_of_birth {
            user.date_of_birth = date_of_birth;
        }
        if let Some(addresses) = &update.addresses {
            user.addresses = addresses.clone();
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.password_hash = password_hash.to_string();
        Ok(Some(user.clone()))
    }
}
