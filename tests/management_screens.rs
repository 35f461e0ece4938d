mod common;

use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

use brew_console::guard::LANDING_PATH;
use brew_console::models::inventory::InventoryItem;
use brew_console::screens::inventory::InventoryScreen;
use brew_console::screens::products::ProductFormScreen;
use brew_console::screens::reports::ReportsScreen;
use brew_console::screens::settings::SettingsScreen;
use brew_console::AppError;
use common::{offline_console_as, MockBackend};

fn syrup() -> InventoryItem {
    InventoryItem {
        name: "Vanilla syrup".into(),
        category: "syrup".into(),
        quantity: 6.0,
        unit: "bottle".into(),
        reorder_level: 2.0,
        ..InventoryItem::default()
    }
}

#[tokio::test]
async fn shift_manager_runs_inventory() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = TempDir::new()?;
    let console = backend.console(&dir)?;
    console.sessions.sign_in("shift_lead", "shift123").await?;

    let gate = console.gate();
    let admission = console
        .navigator()
        .push("/management/inventory")
        .admission
        .expect("shift manager manages inventory");
    assert_eq!(admission.path, "/management/inventory");

    let mut screen = InventoryScreen::default();
    assert!(screen.load(&console.api, &admission).await?);
    assert_eq!(screen.items.len(), 2);
    let low: Vec<&str> = screen.low_stock().map(|item| item.name.as_str()).collect();
    assert_eq!(low, vec!["Oat milk"]);

    assert!(screen.add(&console.api, &admission, &gate, &syrup()).await?);
    assert_eq!(screen.items.len(), 3);
    assert_eq!(screen.items[2].id, Some(3));

    let mut milk = screen.items[0].clone();
    milk.quantity = 12.0;
    assert!(screen.update(&console.api, &admission, &gate, &milk).await?);
    assert_eq!(screen.items[0].quantity, 12.0);
    assert_eq!(screen.low_stock().count(), 0);

    assert!(screen.delete(&console.api, &admission, &gate, 2).await?);
    assert!(screen.items.iter().all(|item| item.id != Some(2)));

    let calls: Vec<(String, String)> = backend
        .state
        .recorded()
        .into_iter()
        .map(|call| (call.method, call.path))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("POST".to_string(), "/inventory".to_string()),
            ("PUT".to_string(), "/inventory/1".to_string()),
            ("DELETE".to_string(), "/inventory/2".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn invalid_or_unpermitted_inventory_changes_send_nothing() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = TempDir::new()?;
    let console = backend.console(&dir)?;

    console.sessions.sign_in("shift_lead", "shift123").await?;
    let admission = console.navigator().push("/management/inventory").admission.expect("admitted");
    let mut screen = InventoryScreen::default();
    let nameless = InventoryItem {
        name: "  ".into(),
        ..syrup()
    };
    let err = screen.add(&console.api, &admission, &console.gate(), &nameless).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {err:?}");
    let unsaved = syrup();
    let err = screen.update(&console.api, &admission, &console.gate(), &unsaved).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {err:?}");

    console.sessions.sign_in("barista", "barista123").await?;
    let visit = console.navigator().push("/management/inventory");
    assert_eq!(visit.location(), Some(LANDING_PATH));
    let admission = visit.admission.expect("landed on products");
    let err = screen.add(&console.api, &admission, &console.gate(), &syrup()).await.unwrap_err();
    assert!(matches!(err, AppError::AuthorizationDenied(_)), "got {err:?}");

    assert!(backend.state.recorded().is_empty());
    Ok(())
}

#[tokio::test]
async fn owner_saves_store_settings() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = TempDir::new()?;
    let console = backend.console(&dir)?;
    console.sessions.sign_in("owner", "owner123").await?;

    let gate = console.gate();
    let admission = console.navigator().push("/management/settings").admission.expect("admitted");
    let mut screen = SettingsScreen::default();

    let settings = json!({"storeName": "Bean There", "currency": "USD"});
    assert!(screen.save(&console.api, &admission, &gate, settings.clone()).await?);
    assert_eq!(screen.settings.as_ref(), Some(&settings));
    assert!(screen.notice.is_some());

    let err = screen
        .save(&console.api, &admission, &gate, json!({"currency": "BTC"}))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {err:?}");

    let recorded = backend.state.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/settings");
    assert_eq!(recorded[0].body, settings);
    Ok(())
}

#[tokio::test]
async fn store_manager_cannot_save_settings() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = TempDir::new()?;
    let console = backend.console(&dir)?;
    console.sessions.sign_in("manager", "manager123").await?;

    let visit = console.navigator().push("/management/settings");
    assert_eq!(visit.location(), Some(LANDING_PATH));
    let admission = visit.admission.expect("landed on products");

    let mut screen = SettingsScreen::default();
    let err = screen
        .save(&console.api, &admission, &console.gate(), json!({"currency": "EUR"}))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthorizationDenied(_)), "got {err:?}");
    assert!(backend.state.recorded().is_empty());
    Ok(())
}

#[tokio::test]
async fn store_manager_adds_a_product() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = TempDir::new()?;
    let console = backend.console(&dir)?;
    console.sessions.sign_in("manager", "manager123").await?;

    let gate = console.gate();
    let admission = console.navigator().push("/add-product").admission.expect("admitted");
    let mut form = ProductFormScreen::default();

    let err = form.submit(&console.api, &admission, &gate).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got {err:?}");

    form.draft.name = "Cold Brew".into();
    form.draft.price = 3.5;
    let created = form.submit(&console.api, &admission, &gate).await?.expect("created");
    assert_eq!(created.id, 3);
    assert_eq!(created.name, "Cold Brew");

    let recorded = backend.state.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!((recorded[0].method.as_str(), recorded[0].path.as_str()), ("POST", "/products"));
    assert_eq!(recorded[0].body["price"], json!(3.5));
    Ok(())
}

#[tokio::test]
async fn shift_manager_cannot_add_products() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = TempDir::new()?;
    let console = backend.console(&dir)?;
    console.sessions.sign_in("shift_lead", "shift123").await?;

    let visit = console.navigator().push("/add-product");
    assert_eq!(visit.location(), Some(LANDING_PATH));
    let admission = visit.admission.expect("landed on products");

    let mut form = ProductFormScreen::default();
    form.draft.name = "Cold Brew".into();
    let err = form.submit(&console.api, &admission, &console.gate()).await.unwrap_err();
    assert!(matches!(err, AppError::AuthorizationDenied(_)), "got {err:?}");
    assert!(backend.state.recorded().is_empty());
    Ok(())
}

#[tokio::test]
async fn report_banner_depends_on_role() -> Result<()> {
    let extended = Some("You have access to additional reports like sales reports and financial data.");
    let limited = Some("Shift managers have limited report access.");

    for (role, expected) in [
        ("owner", extended),
        ("store_manager", extended),
        ("shift_manager", limited),
        ("barista", None),
    ] {
        let console = offline_console_as(role).await?;
        assert_eq!(ReportsScreen::access_note(&console.gate()), expected, "{role}");
    }
    Ok(())
}
