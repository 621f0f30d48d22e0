//! # The POS Engine
//!
//! The `Pos` service: the single entry point for every operation the
//! terminal performs.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Pos                                        │
//! │                                                                         │
//! │  Session      login / logout / current_user                             │
//! │  Shift        start_shift / end_shift             (shift.rs)            │
//! │  Checkout     cart ops / complete_sale / return   (checkout.rs)         │
//! │  Drawer       process_payout                      (payout.rs)           │
//! │  Parking      hold / recall / delete receipt      (held.rs)             │
//! │  Documents    sales, work orders, layaways, POs   (orders/)             │
//! │  Catalog      products / customers / suppliers    (this file)           │
//! │  Backup       export / restore / factory reset    (this file)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method that mutates anything locks the session mutex for its whole
//! duration. See [`crate::session`] for the concurrency model.

use chrono::Utc;
use duka_core::{validation, CoreError, Customer, Product, Role, Supplier, User};
use duka_store::{Collection, DocumentRecord, Store, StoreConfig};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PosConfig;
use crate::error::{PosError, PosResult};
use crate::session::Session;

/// The POS engine. One instance per terminal.
#[derive(Debug)]
pub struct Pos {
    pub(crate) store: Store,
    pub(crate) config: PosConfig,
    pub(crate) session: Mutex<Session>,
}

impl Pos {
    /// Opens the engine against the configured database, running migrations.
    pub async fn open(config: PosConfig) -> PosResult<Self> {
        let store = Store::new(StoreConfig::new(&config.database_path)).await?;
        info!(store_name = %config.store_name, "POS engine ready");
        Ok(Pos {
            store,
            config,
            session: Mutex::new(Session::default()),
        })
    }

    /// Opens the engine on an in-memory store (for tests).
    pub async fn open_in_memory(config: PosConfig) -> PosResult<Self> {
        let store = Store::new(StoreConfig::in_memory()).await?;
        Ok(Pos {
            store,
            config,
            session: Mutex::new(Session::default()),
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &PosConfig {
        &self.config
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs a user in by email and password, returning a session token.
    ///
    /// Credentials are compared in cleartext against the stored user record.
    /// If the user still has an active shift from a previous session (e.g.
    /// the app was killed mid-shift), it is re-attached.
    pub async fn login(&self, email: &str, password: &str) -> PosResult<String> {
        let mut session = self.session.lock().await;

        let users: Vec<User> = self.store.documents().get_all(Collection::Users).await?;
        let user = users
            .into_iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(PosError::InvalidCredentials)?;

        // Recover a shift left open by a crash or forced quit.
        let shifts: Vec<duka_core::Shift> =
            self.store.documents().get_all(Collection::Shifts).await?;
        let open_shift = shifts
            .into_iter()
            .find(|s| s.user_id == user.id && s.is_active());
        if let Some(ref shift) = open_shift {
            warn!(shift_id = %shift.id, "Re-attaching active shift from previous session");
        }

        let token = Uuid::new_v4().to_string();
        info!(user = %user.name, "User logged in");

        session.user = Some(user);
        session.token = Some(token.clone());
        session.active_shift_id = open_shift.map(|s| s.id);
        session.reset_cart();

        Ok(token)
    }

    /// Logs the current user out.
    ///
    /// Refused while a shift is active: the drawer must be reconciled
    /// before the cashier walks away.
    pub async fn logout(&self) -> PosResult<()> {
        let mut session = self.session.lock().await;
        session.require_user()?;

        if let Some(shift_id) = &session.active_shift_id {
            return Err(CoreError::ShiftStillActive(shift_id.clone()).into());
        }

        info!("User logged out");
        *session = Session::default();
        Ok(())
    }

    /// The currently logged-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.session.lock().await.user.clone()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Creates or replaces a product.
    pub async fn save_product(&self, product: Product) -> PosResult<Product> {
        validation::validate_name("name", &product.name)?;
        validation::validate_sku(&product.sku)?;
        validation::validate_non_negative("price", product.price)?;
        validation::validate_non_negative("cost", product.cost)?;

        self.store
            .documents()
            .save(Collection::Products, &product.id, &product)
            .await?;
        info!(sku = %product.sku, "Product saved");
        Ok(product)
    }

    /// Fetches a product by id.
    pub async fn get_product(&self, id: &str) -> PosResult<Product> {
        self.load_product(id).await
    }

    /// Every product in the catalog.
    pub async fn list_products(&self) -> PosResult<Vec<Product>> {
        Ok(self.store.documents().get_all(Collection::Products).await?)
    }

    /// Finds active products matching a query against sku, barcode, or name
    /// (case-insensitive substring).
    pub async fn search_products(&self, query: &str) -> PosResult<Vec<Product>> {
        let needle = query.to_lowercase();
        let products: Vec<Product> =
            self.store.documents().get_all(Collection::Products).await?;
        Ok(products
            .into_iter()
            .filter(|p| {
                p.active
                    && (p.sku.to_lowercase().contains(&needle)
                        || p.name.to_lowercase().contains(&needle)
                        || p.barcode
                            .as_deref()
                            .is_some_and(|b| b.to_lowercase().contains(&needle)))
            })
            .collect())
    }

    // =========================================================================
    // Customers & Suppliers
    // =========================================================================

    /// Creates a customer with a fresh loyalty balance.
    pub async fn create_customer(
        &self,
        name: &str,
        phone: Option<String>,
        email: Option<String>,
    ) -> PosResult<Customer> {
        validation::validate_name("name", name)?;

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone,
            email,
            loyalty_points: 0,
            created_at: Utc::now(),
        };
        self.store
            .documents()
            .save(Collection::Customers, &customer.id, &customer)
            .await?;
        info!(customer = %customer.name, "Customer created");
        Ok(customer)
    }

    pub async fn list_customers(&self) -> PosResult<Vec<Customer>> {
        Ok(self.store.documents().get_all(Collection::Customers).await?)
    }

    /// Manually adjusts a customer's loyalty balance (goodwill credits,
    /// corrections). Admin only - there is no automatic accrual, so every
    /// point in the system enters through here.
    pub async fn adjust_loyalty_points(
        &self,
        customer_id: &str,
        delta: i64,
    ) -> PosResult<Customer> {
        let session = self.session.lock().await;
        self.require_admin(&session)?;

        let mut customer: Customer = self
            .store
            .documents()
            .get_required(Collection::Customers, customer_id)
            .await?;
        customer.loyalty_points += delta;
        self.store
            .documents()
            .save(Collection::Customers, &customer.id, &customer)
            .await?;
        info!(customer = %customer.name, points = customer.loyalty_points, "Loyalty balance adjusted");
        Ok(customer)
    }

    /// Creates a supplier.
    pub async fn create_supplier(
        &self,
        name: &str,
        phone: Option<String>,
        email: Option<String>,
    ) -> PosResult<Supplier> {
        validation::validate_name("name", name)?;

        let supplier = Supplier {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone,
            email,
            created_at: Utc::now(),
        };
        self.store
            .documents()
            .save(Collection::Suppliers, &supplier.id, &supplier)
            .await?;
        info!(supplier = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    pub async fn list_suppliers(&self) -> PosResult<Vec<Supplier>> {
        Ok(self.store.documents().get_all(Collection::Suppliers).await?)
    }

    /// Creates a staff user.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> PosResult<User> {
        validation::validate_name("name", name)?;
        validation::validate_text("email", email, 200)?;
        validation::validate_text("password", password, 200)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            created_at: Utc::now(),
        };
        self.store
            .documents()
            .save(Collection::Users, &user.id, &user)
            .await?;
        info!(user = %user.name, role = ?user.role, "User created");
        Ok(user)
    }

    // =========================================================================
    // Backup
    // =========================================================================

    /// Exports every document as a backup bundle.
    pub async fn export_backup(&self) -> PosResult<Vec<DocumentRecord>> {
        let _session = self.session.lock().await;
        let records = self.store.documents().export_all().await?;
        info!(count = records.len(), "Backup exported");
        Ok(records)
    }

    /// Restores a backup bundle, replacing all current data. Admin only.
    pub async fn restore_backup(&self, records: &[DocumentRecord]) -> PosResult<()> {
        let mut session = self.session.lock().await;
        self.require_admin(&session)?;

        self.store.documents().restore_all(records).await?;

        // The restored data invalidates everything cached in the session.
        session.active_shift_id = None;
        session.reset_cart();

        warn!(count = records.len(), "Backup restored - all previous data replaced");
        Ok(())
    }

    /// Factory reset: wipes every document. Admin only.
    pub async fn factory_reset(&self) -> PosResult<()> {
        let mut session = self.session.lock().await;
        self.require_admin(&session)?;

        self.store.documents().wipe().await?;
        session.active_shift_id = None;
        session.reset_cart();

        warn!("Factory reset - all data wiped");
        Ok(())
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    pub(crate) fn require_admin(&self, session: &Session) -> PosResult<()> {
        let user = session.require_user()?;
        if user.role != Role::Admin {
            return Err(PosError::Forbidden {
                required: Role::Admin,
            });
        }
        Ok(())
    }

    /// Loads a product or maps the miss to the domain error.
    pub(crate) async fn load_product(&self, product_id: &str) -> PosResult<Product> {
        self.store
            .documents()
            .get::<Product>(Collection::Products, product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()).into())
    }

    /// Applies a stock delta to an inventory product and persists it.
    /// Services are ignored.
    pub(crate) async fn adjust_stock(&self, product_id: &str, delta: i64) -> PosResult<()> {
        let mut product = self.load_product(product_id).await?;
        if !product.tracks_stock() {
            return Ok(());
        }
        product.stock += delta;
        product.updated_at = Utc::now();
        self.store
            .documents()
            .save(Collection::Products, &product.id, &product)
            .await?;
        Ok(())
    }
}
