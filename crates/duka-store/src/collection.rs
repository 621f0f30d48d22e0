//! # Collections
//!
//! The closed set of document collections in the store.
//!
//! A typed enum (rather than raw strings at call sites) means a typo'd
//! collection name is a compile error, and the backup/wipe paths can
//! enumerate every collection mechanically.

/// A named collection of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Sales,
    Shifts,
    Payouts,
    Customers,
    HeldReceipts,
    SalesOrders,
    WorkOrders,
    Layaways,
    PurchaseOrders,
    SupplierInvoices,
    Suppliers,
    Users,
}

impl Collection {
    /// The collection's name as stored in the `collection` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "products",
            Collection::Sales => "sales",
            Collection::Shifts => "shifts",
            Collection::Payouts => "payouts",
            Collection::Customers => "customers",
            Collection::HeldReceipts => "held_receipts",
            Collection::SalesOrders => "sales_orders",
            Collection::WorkOrders => "work_orders",
            Collection::Layaways => "layaways",
            Collection::PurchaseOrders => "purchase_orders",
            Collection::SupplierInvoices => "supplier_invoices",
            Collection::Suppliers => "suppliers",
            Collection::Users => "users",
        }
    }

    /// Every collection, in backup/restore order.
    pub const ALL: [Collection; 13] = [
        Collection::Products,
        Collection::Sales,
        Collection::Shifts,
        Collection::Payouts,
        Collection::Customers,
        Collection::HeldReceipts,
        Collection::SalesOrders,
        Collection::WorkOrders,
        Collection::Layaways,
        Collection::PurchaseOrders,
        Collection::SupplierInvoices,
        Collection::Suppliers,
        Collection::Users,
    ];

    /// Parses a stored collection name back to the enum (used by restore).
    pub fn parse(name: &str) -> Option<Collection> {
        Collection::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for c in Collection::ALL {
            assert_eq!(Collection::parse(c.as_str()), Some(c));
        }
        assert_eq!(Collection::parse("nonsense"), None);
    }
}
