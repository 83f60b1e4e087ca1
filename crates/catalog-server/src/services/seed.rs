//! Demo data created at startup

use super::AuthService;
use anyhow::{Context, Result};
use catalog_core::{ItemCreate, ItemStatus, ItemStore, RecordStore};
use tracing::info;

const SAMPLE_ITEMS: &[(&str, &str, f64, ItemStatus)] = &[
    (
        "Premium Headphones",
        "High-quality wireless headphones with noise cancellation",
        199.99,
        ItemStatus::Active,
    ),
    (
        "Smart Watch",
        "Feature-rich smartwatch with fitness tracking",
        299.99,
        ItemStatus::Active,
    ),
    (
        "Bluetooth Speaker",
        "Portable Bluetooth speaker with excellent sound quality",
        79.99,
        ItemStatus::Inactive,
    ),
];

/// Create the admin account and a few items owned by it.
pub async fn seed_demo_data(
    auth: &AuthService,
    items: &ItemStore,
    admin_password: &str,
) -> Result<()> {
    let admin = auth
        .create_superuser(
            "admin@example.com",
            "admin",
            Some("System Administrator"),
            admin_password,
        )
        .await
        .context("Failed to create admin user")?;

    for (title, description, price, status) in SAMPLE_ITEMS {
        let req = ItemCreate {
            title: title.to_string(),
            description: Some(description.to_string()),
            price: *price,
            status: *status,
        };
        items
            .create(req.owned_by(admin.id))
            .await
            .context("Failed to create sample item")?;
    }

    info!(
        admin_id = admin.id,
        items = SAMPLE_ITEMS.len(),
        "Demo data seeded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::fast_argon2;
    use catalog_core::{ItemFilter, Page, UserStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_creates_admin_and_items() {
        let users = Arc::new(UserStore::new());
        let items = ItemStore::new();
        let auth = AuthService::with_argon2(users.clone(), "s".into(), 30, fast_argon2());

        seed_demo_data(&auth, &items, "AdminPass123").await.unwrap();

        let admin = users
            .get_by_unique_field("email", "admin@example.com")
            .await
            .unwrap();
        assert!(admin.is_superuser);
        assert_eq!(admin.id, 1);
        assert_eq!(auth.authenticate("admin", "AdminPass123").await.unwrap(), 1);

        let owned = items
            .list(&ItemFilter::owned_by(admin.id), Page::default())
            .await;
        let titles: Vec<_> = owned.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Premium Headphones", "Smart Watch", "Bluetooth Speaker"]
        );
        assert_eq!(owned[2].status, ItemStatus::Inactive);
    }

    #[tokio::test]
    async fn test_seeding_twice_fails_on_duplicate_admin() {
        let users = Arc::new(UserStore::new());
        let items = ItemStore::new();
        let auth = AuthService::with_argon2(users, "s".into(), 30, fast_argon2());

        seed_demo_data(&auth, &items, "AdminPass123").await.unwrap();
        assert!(seed_demo_data(&auth, &items, "AdminPass123").await.is_err());
        assert_eq!(items.len().await, 3);
    }
}
