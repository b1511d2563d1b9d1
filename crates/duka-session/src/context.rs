//! # Session Context
//!
//! The top-level object a UI shell holds for one cashier session. Owns
//! the sale state, the catalog cache, the notification center, the
//! alert service, the submitter and the background task scheduler.
//!
//! ## Ownership Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SessionContext                                   │
//! │                                                                         │
//! │   SaleHandle ◄──────────┐          CatalogCache ◄─────────┐             │
//! │   (cart, discounts,     │          (latest product        │             │
//! │    payment, customer)   │           snapshots)            │             │
//! │         ▲               │                ▲                │             │
//! │         │               │                │                │             │
//! │   cart facade     TransactionSubmitter   │          AlertService        │
//! │   (add/remove/          │                │          (scan + dedup)      │
//! │    quantity/discount)   │                │                ▲             │
//! │                         ▼                │                │             │
//! │                 TransactionGateway  CatalogSource    Scheduler          │
//! │                    (remote API)     (remote API)   (stock / expiry /    │
//! │                                                     device polls)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use duka_api::{
    CatalogSource, DeviceGateway, HttpApi, NotificationStore, PairedDevice, TransactionGateway,
};
use duka_core::alert::Alert;
use duka_core::cart::{Cart, CartLine};
use duka_core::error::CoreError;
use duka_core::money::Rate;
use duka_core::pricing::{compute_totals, CartTotals};
use duka_core::types::{CustomerRef, PaymentMethod, ProductSnapshot, TaxPolicy, Transaction};
use duka_core::validation::{validate_discount_percent, validate_quantity};

use crate::alerts::AlertService;
use crate::config::SessionConfig;
use crate::error::SessionResult;
use crate::notify::{NotificationCenter, NotificationCue};
use crate::scheduler::Scheduler;
use crate::submit::{SubmitState, TransactionSubmitter};

// =============================================================================
// Sale State
// =============================================================================

/// Everything that describes the in-progress sale.
#[derive(Debug, Default)]
pub struct SaleState {
    pub cart: Cart,
    pub global_discount: Rate,
    pub payment: Option<PaymentMethod>,
    pub customer: Option<CustomerRef>,
    pub notes: Option<String>,
}

impl SaleState {
    /// Returns the sale to its blank state for the next customer.
    pub fn reset(&mut self) {
        self.cart.clear();
        self.global_discount = Rate::zero();
        self.payment = None;
        self.customer = None;
        self.notes = None;
    }
}

/// Shared handle to the sale state.
///
/// Mutations go through the closure helpers so the lock never escapes
/// and is never held across an await point.
#[derive(Clone, Default)]
pub struct SaleHandle(Arc<Mutex<SaleState>>);

impl SaleHandle {
    pub fn new() -> Self {
        SaleHandle(Arc::new(Mutex::new(SaleState::default())))
    }

    pub fn with<R>(&self, f: impl FnOnce(&SaleState) -> R) -> R {
        let state = self.0.lock().expect("Sale state mutex poisoned");
        f(&state)
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut SaleState) -> R) -> R {
        let mut state = self.0.lock().expect("Sale state mutex poisoned");
        f(&mut state)
    }
}

// =============================================================================
// Catalog Cache
// =============================================================================

/// Latest product snapshots from the remote catalog.
///
/// Cart lines freeze prices at add time, so replacing the cache never
/// disturbs an in-progress sale.
#[derive(Clone, Default)]
pub struct CatalogCache(Arc<Mutex<Vec<ProductSnapshot>>>);

impl CatalogCache {
    pub fn new() -> Self {
        CatalogCache(Arc::new(Mutex::new(Vec::new())))
    }

    /// Replaces the cache wholesale with a fresh fetch.
    pub fn replace(&self, products: Vec<ProductSnapshot>) {
        *self.0.lock().expect("Catalog cache mutex poisoned") = products;
    }

    /// Looks a product up by id.
    pub fn get(&self, product_id: &str) -> Option<ProductSnapshot> {
        self.0
            .lock()
            .expect("Catalog cache mutex poisoned")
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
    }

    /// Full copy of the cached snapshots.
    pub fn snapshot(&self) -> Vec<ProductSnapshot> {
        self.0.lock().expect("Catalog cache mutex poisoned").clone()
    }
}

// =============================================================================
// Session Context
// =============================================================================

/// One cashier session: sale state, collaborators and background tasks.
pub struct SessionContext {
    config: SessionConfig,
    policy: TaxPolicy,
    sale: SaleHandle,
    catalog: CatalogCache,
    devices: Arc<Mutex<Vec<PairedDevice>>>,
    notifications: Arc<NotificationCenter>,
    alerts: Arc<AlertService>,
    submitter: Arc<TransactionSubmitter>,
    catalog_source: Arc<dyn CatalogSource>,
    device_gateway: Arc<dyn DeviceGateway>,
    scheduler: Scheduler,
}

impl SessionContext {
    /// Builds a session against the configured remote API.
    pub fn new(config: SessionConfig, cue: Arc<dyn NotificationCue>) -> SessionResult<Self> {
        let api = Arc::new(HttpApi::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        )?);

        Ok(Self::with_collaborators(
            config,
            Arc::clone(&api) as Arc<dyn CatalogSource>,
            Arc::clone(&api) as Arc<dyn TransactionGateway>,
            Arc::clone(&api) as Arc<dyn NotificationStore>,
            api as Arc<dyn DeviceGateway>,
            cue,
        ))
    }

    /// Builds a session with explicit collaborators (tests swap in
    /// mocks here).
    pub fn with_collaborators(
        config: SessionConfig,
        catalog_source: Arc<dyn CatalogSource>,
        gateway: Arc<dyn TransactionGateway>,
        store: Arc<dyn NotificationStore>,
        device_gateway: Arc<dyn DeviceGateway>,
        cue: Arc<dyn NotificationCue>,
    ) -> Self {
        let policy = config.tax.to_policy();
        let sale = SaleHandle::new();
        let catalog = CatalogCache::new();
        let notifications = Arc::new(NotificationCenter::new(store, cue));
        let alerts = Arc::new(AlertService::new(
            config.alerts.to_windows(),
            Arc::clone(&notifications),
        ));
        let submitter = Arc::new(TransactionSubmitter::new(
            sale.clone(),
            catalog.clone(),
            gateway,
            Arc::clone(&catalog_source),
            Arc::clone(&notifications),
            policy.clone(),
        ));

        SessionContext {
            config,
            policy,
            sale,
            catalog,
            devices: Arc::new(Mutex::new(Vec::new())),
            notifications,
            alerts,
            submitter,
            catalog_source,
            device_gateway,
            scheduler: Scheduler::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Background Tasks
    // -------------------------------------------------------------------------

    /// Spawns the recurring tasks: stock scan, expiry scan and paired
    /// device activity poll.
    pub fn start(&mut self) {
        info!("Session starting");

        {
            let catalog_source = Arc::clone(&self.catalog_source);
            let catalog = self.catalog.clone();
            let alerts = Arc::clone(&self.alerts);
            self.scheduler.spawn_periodic(
                "stock-scan",
                Duration::from_secs(self.config.polling.stock_interval_secs),
                move || {
                    let catalog_source = Arc::clone(&catalog_source);
                    let catalog = catalog.clone();
                    let alerts = Arc::clone(&alerts);
                    async move {
                        match catalog_source.fetch_products().await {
                            Ok(products) => {
                                catalog.replace(products);
                                alerts.run_scan(&catalog.snapshot(), Utc::now());
                            }
                            Err(e) => warn!(error = %e, "Catalog poll failed"),
                        }
                    }
                },
            );
        }

        {
            // Expiry classification only moves day by day; the daily
            // pass works from the cached snapshot.
            let catalog = self.catalog.clone();
            let alerts = Arc::clone(&self.alerts);
            self.scheduler.spawn_periodic(
                "expiry-scan",
                Duration::from_secs(self.config.polling.expiry_interval_secs),
                move || {
                    let catalog = catalog.clone();
                    let alerts = Arc::clone(&alerts);
                    async move {
                        alerts.run_scan(&catalog.snapshot(), Utc::now());
                    }
                },
            );
        }

        {
            let device_gateway = Arc::clone(&self.device_gateway);
            let devices = Arc::clone(&self.devices);
            self.scheduler.spawn_periodic(
                "device-activity",
                Duration::from_secs(self.config.polling.device_activity_interval_secs),
                move || {
                    let device_gateway = Arc::clone(&device_gateway);
                    let devices = Arc::clone(&devices);
                    async move {
                        match device_gateway.fetch_devices().await {
                            Ok(list) => {
                                *devices.lock().expect("Device cache mutex poisoned") = list;
                            }
                            Err(e) => warn!(error = %e, "Device activity poll failed"),
                        }
                    }
                },
            );
        }
    }

    /// Stops the recurring tasks and waits for them.
    pub async fn stop(&mut self) {
        info!("Session stopping");
        self.scheduler.shutdown().await;
    }

    // -------------------------------------------------------------------------
    // Cart Facade
    // -------------------------------------------------------------------------

    /// Adds a catalog product to the cart (or merges into its line).
    pub fn add_to_cart(&self, product_id: &str, quantity: i64) -> SessionResult<()> {
        validate_quantity(quantity).map_err(CoreError::from)?;
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        self.sale.with_mut(|s| s.cart.add_line(&product, quantity));
        Ok(())
    }

    /// Sets a line's quantity; zero or less removes the line.
    pub fn set_quantity(&self, product_id: &str, quantity: i64) {
        self.sale
            .with_mut(|s| s.cart.set_quantity(product_id, quantity));
    }

    /// Removes a line unconditionally.
    pub fn remove_from_cart(&self, product_id: &str) {
        self.sale.with_mut(|s| s.cart.remove_line(product_id));
    }

    /// Applies a per-line discount percentage.
    pub fn apply_line_discount(&self, product_id: &str, percent: f64) -> SessionResult<()> {
        validate_discount_percent(percent).map_err(CoreError::from)?;
        self.sale
            .with_mut(|s| s.cart.apply_discount(product_id, Rate::from_percent(percent)));
        Ok(())
    }

    /// Sets the sale-wide discount percentage.
    pub fn set_global_discount(&self, percent: f64) -> SessionResult<()> {
        validate_discount_percent(percent).map_err(CoreError::from)?;
        self.sale
            .with_mut(|s| s.global_discount = Rate::from_percent(percent));
        Ok(())
    }

    /// Selects the payment method for the sale.
    pub fn select_payment(&self, method: PaymentMethod) {
        self.sale.with_mut(|s| s.payment = Some(method));
    }

    /// Attaches (or detaches) the customer.
    pub fn attach_customer(&self, customer: Option<CustomerRef>) {
        self.sale.with_mut(|s| s.customer = customer);
    }

    /// Sets free-form sale notes.
    pub fn set_notes(&self, notes: Option<String>) {
        self.sale.with_mut(|s| s.notes = notes);
    }

    /// Abandons the in-progress sale.
    pub fn reset_sale(&self) {
        self.sale.with_mut(|s| s.reset());
    }

    /// Current cart lines, for rendering.
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.sale.with(|s| s.cart.lines().to_vec())
    }

    /// Current derived totals under the active payment method.
    pub fn totals(&self) -> CartTotals {
        self.sale
            .with(|s| compute_totals(&s.cart, s.global_discount, s.payment, &self.policy))
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Submits the current sale. See [`TransactionSubmitter::submit`].
    pub async fn submit(&self) -> SessionResult<Transaction> {
        self.submitter.submit().await
    }

    /// Where the submitter currently is in its state machine.
    pub fn submit_state(&self) -> SubmitState {
        self.submitter.state()
    }

    // -------------------------------------------------------------------------
    // Catalog / Alerts / Devices
    // -------------------------------------------------------------------------

    /// Fetches the catalog now and runs an immediate alert scan.
    pub async fn refresh_catalog(&self) -> SessionResult<()> {
        let products = self.catalog_source.fetch_products().await?;
        self.catalog.replace(products);
        self.alerts.run_scan(&self.catalog.snapshot(), Utc::now());
        Ok(())
    }

    /// Alerts for the current cached snapshot, prioritized. Does not
    /// touch dedup history or emit notifications.
    pub fn active_alerts(&self) -> Vec<Alert> {
        duka_core::alert::scan(&self.catalog.snapshot(), Utc::now())
    }

    /// Cached paired device list (refreshed by the activity poll).
    pub fn devices(&self) -> Vec<PairedDevice> {
        self.devices
            .lock()
            .expect("Device cache mutex poisoned")
            .clone()
    }

    /// Revokes a paired device and refreshes the cached list.
    pub async fn revoke_device(&self, device_id: &str) -> SessionResult<()> {
        self.device_gateway.revoke_device(device_id).await?;
        match self.device_gateway.fetch_devices().await {
            Ok(list) => *self.devices.lock().expect("Device cache mutex poisoned") = list,
            Err(e) => warn!(error = %e, "Device refresh after revoke failed"),
        }
        Ok(())
    }

    /// The notification center, for the UI's log panel.
    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use duka_api::{
        ApiResult, NotificationRecord, TransactionRequest, TransactionResponse,
    };
    use duka_core::money::Money;

    use crate::error::SessionError;
    use crate::notify::NoOpCue;

    struct FakeApi {
        products: Vec<ProductSnapshot>,
        device_fetches: AtomicUsize,
        revoked: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new(products: Vec<ProductSnapshot>) -> Arc<Self> {
            Arc::new(FakeApi {
                products,
                device_fetches: AtomicUsize::new(0),
                revoked: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CatalogSource for FakeApi {
        async fn fetch_products(&self) -> ApiResult<Vec<ProductSnapshot>> {
            Ok(self.products.clone())
        }
    }

    #[async_trait]
    impl TransactionGateway for FakeApi {
        async fn submit(&self, _request: &TransactionRequest) -> ApiResult<TransactionResponse> {
            Ok(TransactionResponse {
                transaction_number: Some("TX-100".to_string()),
                id: None,
            })
        }
    }

    #[async_trait]
    impl NotificationStore for FakeApi {
        async fn persist(&self, _record: &NotificationRecord) -> ApiResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl DeviceGateway for FakeApi {
        async fn fetch_devices(&self) -> ApiResult<Vec<PairedDevice>> {
            self.device_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![PairedDevice {
                id: "d1".to_string(),
                name: "Till Phone".to_string(),
                is_active: true,
                last_seen_at: None,
            }])
        }

        async fn revoke_device(&self, device_id: &str) -> ApiResult<()> {
            self.revoked
                .lock()
                .expect("test mutex")
                .push(device_id.to_string());
            Ok(())
        }
    }

    fn product(id: &str, price: i64, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: id.to_string(),
            sku: format!("SKU-{}", id),
            name: format!("Product {}", id),
            category: None,
            selling_price: Money::from_minor(price),
            current_stock: stock,
            min_stock_level: 0,
            has_expiry: false,
            expiry_date: None,
        }
    }

    fn session(api: Arc<FakeApi>) -> SessionContext {
        SessionContext::with_collaborators(
            SessionConfig::default(),
            Arc::clone(&api) as Arc<dyn CatalogSource>,
            Arc::clone(&api) as Arc<dyn TransactionGateway>,
            Arc::clone(&api) as Arc<dyn NotificationStore>,
            api as Arc<dyn DeviceGateway>,
            Arc::new(NoOpCue),
        )
    }

    #[tokio::test]
    async fn test_add_to_cart_requires_cached_product() {
        let api = FakeApi::new(vec![product("p1", 1000, 10)]);
        let ctx = session(api);

        // Catalog not fetched yet
        let err = ctx.add_to_cart("p1", 2).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(CoreError::ProductNotFound(_))
        ));

        ctx.refresh_catalog().await.unwrap();
        ctx.add_to_cart("p1", 2).unwrap();
        assert_eq!(ctx.cart_lines().len(), 1);
        assert_eq!(ctx.totals().subtotal.minor(), 2000);
    }

    #[tokio::test]
    async fn test_invalid_inputs_rejected_before_mutation() {
        let api = FakeApi::new(vec![product("p1", 1000, 10)]);
        let ctx = session(api);
        ctx.refresh_catalog().await.unwrap();

        assert!(ctx.add_to_cart("p1", 0).is_err());
        assert!(ctx.cart_lines().is_empty());

        ctx.add_to_cart("p1", 1).unwrap();
        assert!(ctx.apply_line_discount("p1", 150.0).is_err());
        assert!(ctx.set_global_discount(-5.0).is_err());
        assert!(ctx.totals().discount_total.minor() == 0);
    }

    #[tokio::test]
    async fn test_full_sale_through_the_facade() {
        let api = FakeApi::new(vec![product("p1", 1000, 10)]);
        let ctx = session(api);
        ctx.refresh_catalog().await.unwrap();

        ctx.add_to_cart("p1", 3).unwrap();
        ctx.apply_line_discount("p1", 10.0).unwrap();
        ctx.set_global_discount(5.0).unwrap();
        ctx.select_payment(PaymentMethod::Cash);

        let totals = ctx.totals();
        assert_eq!(totals.total.minor(), 2550);

        let tx = ctx.submit().await.unwrap();
        assert_eq!(tx.id, "TX-100");
        assert_eq!(tx.total_amount.minor(), 2550);
        assert!(ctx.cart_lines().is_empty());
        assert_eq!(ctx.submit_state(), SubmitState::Completed);
    }

    #[tokio::test]
    async fn test_revoke_device_refreshes_cache() {
        let api = FakeApi::new(vec![]);
        let ctx = session(Arc::clone(&api));

        assert!(ctx.devices().is_empty());
        ctx.revoke_device("d1").await.unwrap();

        assert_eq!(api.revoked.lock().expect("test mutex").as_slice(), ["d1"]);
        assert_eq!(ctx.devices().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_tasks_poll_and_stop() {
        let api = FakeApi::new(vec![product("p1", 1000, 10)]);
        let mut ctx = session(Arc::clone(&api));

        ctx.start();
        tokio::time::sleep(Duration::from_millis(1)).await;

        // Immediate first ticks populated both caches
        assert_eq!(ctx.catalog.snapshot().len(), 1);
        assert!(api.device_fetches.load(Ordering::SeqCst) >= 1);

        ctx.stop().await;
        let before = api.device_fetches.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(api.device_fetches.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_reset_sale_clears_everything() {
        let api = FakeApi::new(vec![product("p1", 1000, 10)]);
        let ctx = session(api);
        ctx.refresh_catalog().await.unwrap();

        ctx.add_to_cart("p1", 2).unwrap();
        ctx.set_global_discount(10.0).unwrap();
        ctx.select_payment(PaymentMethod::Card);
        ctx.attach_customer(Some(CustomerRef {
            id: "c1".to_string(),
            name: "Amina".to_string(),
        }));

        ctx.reset_sale();
        assert!(ctx.cart_lines().is_empty());
        assert_eq!(ctx.totals(), CartTotals::empty());
    }
}
