//! # Supply Service
//!
//! The operation facade. One method per user-facing operation, each doing
//! validation first, then delegating to the charge calculator, the ledger
//! engine, or the read-side repositories.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_customer          validate ──► customers.create                   │
//! │  update_customer       validate ──► customers.update_profile           │
//! │  add_entry             validate ──► charge::calculate ──► ledger       │
//! │  delete_entry          ledger (idempotent)                             │
//! │  record_payment        amount > 0 ──► ledger                           │
//! │  delete_customer       ledger (cascading)                              │
//! │  get_* / export_*      repositories and reports (read-only)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ServiceError;
use crate::export;
use jalbook_core::validation::{
    validate_crop_type, validate_customer_name, validate_mobile, validate_village,
};
use jalbook_core::{charge, CoreError, Customer, Money, RateTable, SupplyEntry};
use jalbook_db::{Database, EntryFilter};

/// How many entries the dashboard's recent-activity feed shows.
const RECENT_ACTIVITY_LIMIT: u32 = 10;

/// Everything the dashboard renders in one call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Hours supplied today.
    pub today_supply_hours: f64,
    /// Revenue billed today.
    pub today_revenue: Money,
    /// Outstanding balance across all customers.
    pub pending_amount: Money,
    /// Revenue over the trailing 30 days.
    pub monthly_revenue: Money,
    /// Revenue over the trailing 182 days.
    pub six_month_revenue: Money,
    /// Revenue over the trailing 365 days.
    pub yearly_revenue: Money,
    /// All-time revenue.
    pub total_revenue: Money,
    /// Latest recorded entries, newest first.
    pub recent_activity: Vec<SupplyEntry>,
}

/// Report/export filter as the shell supplies it: whole dates, optional
/// customer. Date bounds are inclusive of the whole day.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Restrict to one customer, or `None` for all.
    pub customer_id: Option<String>,
    /// First day to include.
    pub start_date: Option<NaiveDate>,
    /// Last day to include.
    pub end_date: Option<NaiveDate>,
}

impl ReportFilter {
    fn to_entry_filter(&self) -> EntryFilter {
        EntryFilter {
            customer_id: self.customer_id.clone(),
            from: self.start_date.map(day_start),
            to: self.end_date.map(day_end),
        }
    }
}

/// The service facade. Cheap to clone; holds the database handle and the
/// configured rate schedule.
#[derive(Debug, Clone)]
pub struct SupplyService {
    db: Database,
    rates: RateTable,
}

impl SupplyService {
    /// Creates a service over an opened database with the given rate
    /// schedule.
    pub fn new(db: Database, rates: RateTable) -> Self {
        SupplyService { db, rates }
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Registers a new customer. Balances start at zero.
    ///
    /// ## Errors
    /// `ValidationError` if name, mobile, or village fail validation.
    pub async fn add_customer(
        &self,
        name: &str,
        mobile: &str,
        village: &str,
    ) -> Result<String, ServiceError> {
        validate_customer_name(name)?;
        validate_mobile(mobile)?;
        validate_village(village)?;

        let customer = self.db.customers().create(name, mobile, village).await?;
        Ok(customer.id)
    }

    /// Lists all customers ordered by name.
    pub async fn get_customers(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.db.customers().list_all().await?)
    }

    /// Point lookup of one customer.
    pub async fn get_customer_details(
        &self,
        customer_id: &str,
    ) -> Result<Option<Customer>, ServiceError> {
        Ok(self.db.customers().get_by_id(customer_id).await?)
    }

    /// Updates profile fields; `None` keeps the current value. Balance
    /// fields cannot be edited from here.
    ///
    /// Entries keep the customer name they were billed under; renames do
    /// not rewrite history.
    pub async fn update_customer(
        &self,
        customer_id: &str,
        name: Option<&str>,
        mobile: Option<&str>,
        village: Option<&str>,
    ) -> Result<(), ServiceError> {
        if let Some(name) = name {
            validate_customer_name(name)?;
        }
        if let Some(mobile) = mobile {
            validate_mobile(mobile)?;
        }
        if let Some(village) = village {
            validate_village(village)?;
        }

        self.db
            .customers()
            .update_profile(customer_id, name, mobile, village)
            .await?;
        Ok(())
    }

    /// One customer's supply history, newest session first.
    pub async fn get_customer_history(
        &self,
        customer_id: &str,
    ) -> Result<Vec<SupplyEntry>, ServiceError> {
        Ok(self.db.entries().list_for_customer(customer_id).await?)
    }

    /// Deletes a customer and all their entries.
    pub async fn delete_customer(&self, customer_id: &str) -> Result<(), ServiceError> {
        self.db.ledger().delete_customer(customer_id).await?;
        Ok(())
    }

    // =========================================================================
    // Supply entries
    // =========================================================================

    /// Records a supply session: computes the charge from the rate schedule
    /// and applies it to the ledger atomically.
    ///
    /// ## Errors
    /// - `BusinessLogic` if `end <= start` or the crop has no rate
    /// - `NotFound` if the customer does not exist (nothing is written)
    pub async fn add_entry(
        &self,
        customer_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        crop_type: &str,
    ) -> Result<String, ServiceError> {
        validate_crop_type(crop_type)?;
        let session_charge = charge::calculate(start, end, crop_type, &self.rates)?;

        debug!(
            customer_id,
            crop = crop_type,
            amount = %session_charge.amount,
            "Charge computed for new entry"
        );

        let entry = self
            .db
            .ledger()
            .add_entry(customer_id, start, end, crop_type, session_charge)
            .await?;
        Ok(entry.id)
    }

    /// Deletes an entry, restoring the owner's pending balance if it was
    /// unpaid. Deleting an already-deleted entry succeeds as a no-op.
    pub async fn delete_entry(&self, entry_id: &str) -> Result<(), ServiceError> {
        self.db.ledger().delete_entry(entry_id).await?;
        Ok(())
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Records a payment, settling unpaid entries oldest-first.
    ///
    /// ## Errors
    /// - `PaymentError` if `amount <= 0`
    /// - `NotFound` if the customer does not exist (nothing is written)
    pub async fn record_payment(
        &self,
        customer_id: &str,
        amount: Money,
    ) -> Result<(), ServiceError> {
        if !amount.is_positive() {
            return Err(CoreError::InvalidPaymentAmount { amount }.into());
        }

        self.db.ledger().record_payment(customer_id, amount).await?;
        Ok(())
    }

    // =========================================================================
    // Reports and export
    // =========================================================================

    /// Entries matching a customer/date filter, newest session first.
    pub async fn get_filtered_entries(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<SupplyEntry>, ServiceError> {
        Ok(self
            .db
            .entries()
            .list_filtered(&filter.to_entry_filter())
            .await?)
    }

    /// Renders the filtered entries as a CSV byte blob.
    ///
    /// ## Errors
    /// `NoData` if nothing matches the filter; an empty file is never
    /// produced.
    pub async fn export_entries(&self, filter: &ReportFilter) -> Result<Vec<u8>, ServiceError> {
        let entries = self.get_filtered_entries(filter).await?;

        if entries.is_empty() {
            return Err(ServiceError::no_data());
        }

        export::render_csv(&entries)
    }

    /// Assembles everything the dashboard shows.
    ///
    /// Revenue windows are trailing windows from now, not calendar-aligned.
    /// Reads are unsynchronized with writers; a refresh racing a payment
    /// sees the last committed state.
    pub async fn get_dashboard_data(&self) -> Result<DashboardData, ServiceError> {
        let reports = self.db.reports();
        let now = Utc::now();

        let today = reports.totals(&since(day_start(now.date_naive()))).await?;
        let monthly = reports.totals(&since(now - Duration::days(30))).await?;
        let six_month = reports.totals(&since(now - Duration::days(182))).await?;
        let yearly = reports.totals(&since(now - Duration::days(365))).await?;
        let all_time = reports.totals(&EntryFilter::default()).await?;

        Ok(DashboardData {
            today_supply_hours: today.hours,
            today_revenue: today.revenue,
            pending_amount: reports.total_pending().await?,
            monthly_revenue: monthly.revenue,
            six_month_revenue: six_month.revenue,
            yearly_revenue: yearly.revenue,
            total_revenue: all_time.revenue,
            recent_activity: reports.recent_activity(RECENT_ACTIVITY_LIMIT).await?,
        })
    }
}

/// Filter matching everything from `from` onward.
fn since(from: DateTime<Utc>) -> EntryFilter {
    EntryFilter {
        customer_id: None,
        from: Some(from),
        to: None,
    }
}

/// Midnight at the start of `date`, UTC.
fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is a valid time"))
}

/// Last second of `date`, UTC. Window bounds are inclusive.
fn day_end(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(23, 59, 59).expect("end of day is a valid time"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use jalbook_db::DbConfig;

    async fn test_service() -> SupplyService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        SupplyService::new(db, RateTable::standard())
    }

    /// A session that is unambiguously "today" regardless of when the test
    /// runs: it starts a few minutes from now.
    fn upcoming_session(hours: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc::now() + Duration::minutes(10);
        (start, start + Duration::hours(hours))
    }

    #[tokio::test]
    async fn test_add_customer_validates_fields() {
        let service = test_service().await;

        let err = service.add_customer("", "9876543210", "Shirpur").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = service
            .add_customer("Ramesh", "not-a-number", "Shirpur")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let id = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();
        let loaded = service.get_customer_details(&id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ramesh Patil");
    }

    #[tokio::test]
    async fn test_add_entry_rejects_bad_range_without_side_effects() {
        let service = test_service().await;
        let id = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        let (start, _) = upcoming_session(2);
        let err = service.add_entry(&id, start, start, "Rice").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        // No entry created, no balance change
        assert!(service.get_customer_history(&id).await.unwrap().is_empty());
        let customer = service.get_customer_details(&id).await.unwrap().unwrap();
        assert!(customer.pending_amount.is_zero());
    }

    #[tokio::test]
    async fn test_add_entry_for_unknown_customer_is_not_found() {
        let service = test_service().await;
        let (start, end) = upcoming_session(2);

        let err = service.add_entry("ghost", start, end, "Rice").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_record_payment_rejects_non_positive_amounts() {
        let service = test_service().await;
        let id = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        let err = service
            .record_payment(&id, Money::zero())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);

        let err = service
            .record_payment(&id, Money::from_rupees(-50))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
    }

    #[tokio::test]
    async fn test_entry_payment_flow_updates_balances() {
        let service = test_service().await;
        let id = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        // 2h of Rice at 200/hr = 400
        let (start, end) = upcoming_session(2);
        service.add_entry(&id, start, end, "Rice").await.unwrap();

        let customer = service.get_customer_details(&id).await.unwrap().unwrap();
        assert_eq!(customer.pending_amount.rupees(), 400);

        service
            .record_payment(&id, Money::from_rupees(150))
            .await
            .unwrap();

        let customer = service.get_customer_details(&id).await.unwrap().unwrap();
        assert_eq!(customer.pending_amount.rupees(), 250);
        assert_eq!(customer.total_paid.rupees(), 150);

        // Partial coverage leaves the entry unpaid
        let history = service.get_customer_history(&id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_paid);
    }

    #[tokio::test]
    async fn test_delete_customer_clears_history() {
        let service = test_service().await;
        let id = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        let (start, end) = upcoming_session(2);
        service.add_entry(&id, start, end, "Rice").await.unwrap();

        service.delete_customer(&id).await.unwrap();

        assert!(service.get_customer_details(&id).await.unwrap().is_none());
        assert!(service.get_customer_history(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_empty_fails_with_no_data() {
        let service = test_service().await;

        let err = service
            .export_entries(&ReportFilter::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoData);
    }

    #[tokio::test]
    async fn test_export_renders_bom_and_rows() {
        let service = test_service().await;
        let id = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();
        let (start, end) = upcoming_session(2);
        service.add_entry(&id, start, end, "Rice").await.unwrap();

        let bytes = service
            .export_entries(&ReportFilter::default())
            .await
            .unwrap();
        assert_eq!(&bytes[..3], b"\xef\xbb\xbf");

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains("Ramesh Patil"));
    }

    #[tokio::test]
    async fn test_filtered_entries_by_customer() {
        let service = test_service().await;
        let a = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();
        let b = service
            .add_customer("Anita More", "9876543211", "Akoli")
            .await
            .unwrap();

        let (start, end) = upcoming_session(2);
        service.add_entry(&a, start, end, "Rice").await.unwrap();
        service.add_entry(&b, start, end, "Wheat").await.unwrap();

        let filter = ReportFilter {
            customer_id: Some(a.clone()),
            ..Default::default()
        };
        let entries = service.get_filtered_entries(&filter).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].crop_type, "Rice");
    }

    #[tokio::test]
    async fn test_dashboard_windows_and_pending() {
        let service = test_service().await;
        let id = service
            .add_customer("Ramesh Patil", "9876543210", "Shirpur")
            .await
            .unwrap();

        // Today: 2h Rice = 400
        let (start, end) = upcoming_session(2);
        service.add_entry(&id, start, end, "Rice").await.unwrap();

        // 40 days ago: 1h Wheat = 180 (outside the monthly window)
        let old_start = Utc::now() - Duration::days(40);
        service
            .add_entry(&id, old_start, old_start + Duration::hours(1), "Wheat")
            .await
            .unwrap();

        let dashboard = service.get_dashboard_data().await.unwrap();

        assert_eq!(dashboard.today_supply_hours, 2.0);
        assert_eq!(dashboard.today_revenue.rupees(), 400);
        assert_eq!(dashboard.monthly_revenue.rupees(), 400);
        assert_eq!(dashboard.six_month_revenue.rupees(), 580);
        assert_eq!(dashboard.yearly_revenue.rupees(), 580);
        assert_eq!(dashboard.total_revenue.rupees(), 580);
        assert_eq!(dashboard.pending_amount.rupees(), 580);
        assert_eq!(dashboard.recent_activity.len(), 2);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert!(json["todayRevenue"].is_number());
        assert!(json["recentActivity"].is_array());
    }
}
