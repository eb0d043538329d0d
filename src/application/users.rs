//! Administrative view over stored user profiles.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::{Role, UserId, UserProfile};
use crate::port::outbound::data::{DataService, Filter, Order, Table};
use crate::port::outbound::notifier::Recipient;

/// Number of profiles per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub users: usize,
    pub agents: usize,
    pub admins: usize,
}

impl RoleCounts {
    #[must_use]
    pub fn from_profiles(profiles: &[UserProfile]) -> Self {
        profiles.iter().fold(Self::default(), |mut counts, profile| {
            match profile.role {
                Role::User => counts.users += 1,
                Role::Agent => counts.agents += 1,
                Role::Admin => counts.admins += 1,
            }
            counts
        })
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.users + self.agents + self.admins
    }
}

/// Profile management for administrators.
///
/// Profiles are created by the auth service on registration; this service
/// only reads, edits and deletes them.
pub struct UserDirectory {
    data: Arc<dyn DataService>,
}

impl UserDirectory {
    pub fn new(data: Arc<dyn DataService>) -> Self {
        Self { data }
    }

    /// Every profile, newest first. Empty on failure.
    pub async fn list(&self) -> Vec<UserProfile> {
        let order = Order::descending("created_at");
        match self
            .data
            .select_all(Table::Profiles, &Filter::none(), Some(&order))
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .filter_map(|row| match serde_json::from_value(row) {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable profile row");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                error!(error = %e, "Failed to load users");
                Vec::new()
            }
        }
    }

    /// Change a profile's display name and role.
    pub async fn update_profile(&self, id: &UserId, name: &str, role: Role) -> Option<UserProfile> {
        if name.trim().is_empty() {
            warn!(user_id = %id, "Rejected empty profile name");
            return None;
        }
        let patch = json!({
            "name": name.trim(),
            "role": role,
            "updated_at": Utc::now(),
        });

        match self.data.update(Table::Profiles, id.as_str(), patch).await {
            Ok(Some(row)) => match serde_json::from_value::<UserProfile>(row) {
                Ok(profile) => {
                    info!(user_id = %id, role = %profile.role, "User profile updated");
                    Some(profile)
                }
                Err(e) => {
                    warn!(user_id = %id, error = %e, "Undecodable profile row after update");
                    None
                }
            },
            Ok(None) => {
                warn!(user_id = %id, "User not found for update");
                None
            }
            Err(e) => {
                error!(user_id = %id, error = %e, "Failed to update user");
                None
            }
        }
    }

    pub async fn delete(&self, id: &UserId) -> bool {
        match self.data.delete(Table::Profiles, id.as_str()).await {
            Ok(deleted) => {
                if deleted {
                    info!(user_id = %id, "User deleted");
                }
                deleted
            }
            Err(e) => {
                error!(user_id = %id, error = %e, "Failed to delete user");
                false
            }
        }
    }

    /// Accounts cannot be created from the directory.
    ///
    /// Always returns false; new users must go through registration.
    pub fn create(&self, email: &str) -> bool {
        warn!(email, "User creation refused: new users must register");
        false
    }

    /// Role totals over the current profiles.
    pub async fn role_counts(&self) -> RoleCounts {
        RoleCounts::from_profiles(&self.list().await)
    }

    /// Notification recipients: every profile with an e-mail address.
    pub async fn recipients(&self) -> Vec<Recipient> {
        self.list()
            .await
            .into_iter()
            .filter_map(|profile| {
                profile.email.map(|email| Recipient {
                    name: profile.name,
                    email,
                })
            })
            .collect()
    }
}
