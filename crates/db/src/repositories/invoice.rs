//! Invoice repository: invoice persistence and payment recording.
//!
//! Payments are recorded inside a database transaction that holds an
//! exclusive lock on the invoice row, so concurrent payments against the same
//! invoice are serialized and can never overpay it. Invoices never contend
//! with each other.

use chrono::Utc;
use invoicer_core::invoice::{
    Invoice, InvoiceService, NewInvoice, NewPayment, Payment, ValidationErrors,
};
use invoicer_shared::types::{InvoiceId, PaymentId, to_dollars};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::entities::{invoices, payments};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceRepoError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(InvoiceId),

    /// Input failed validation; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A stored payment row does not satisfy payment invariants.
    #[error("Stored payment {payment_id} is invalid: {errors}")]
    InvalidRecord {
        /// The offending payment.
        payment_id: PaymentId,
        /// What is wrong with it.
        errors: ValidationErrors,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Invoice repository for invoices and their payments.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice.
    ///
    /// `total` goes through [`NewInvoice::build`]: values below 10000 are read
    /// as dollars and converted to cents, larger values are stored as cents.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the total is missing or not positive.
    pub async fn create(&self, total: Option<Decimal>) -> Result<Invoice, InvoiceRepoError> {
        let new_invoice = NewInvoice::build(total).map_err(InvoiceRepoError::Validation)?;

        let now = Utc::now().into();
        let model = invoices::ActiveModel {
            total: Set(new_invoice.total),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!(invoice_id = model.id, total_cents = model.total, "Invoice created");

        Ok(Invoice::new(InvoiceId::new(model.id), model.total, Vec::new()))
    }

    /// Finds an invoice with its payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, id: InvoiceId) -> Result<Option<Invoice>, InvoiceRepoError> {
        let Some(model) = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let payments = load_payments(&self.db, model.id).await?;
        Ok(Some(Invoice::new(id, model.total, payments)))
    }

    /// Gets an invoice with its payments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    pub async fn get(&self, id: InvoiceId) -> Result<Invoice, InvoiceRepoError> {
        self.find(id).await?.ok_or(InvoiceRepoError::NotFound(id))
    }

    /// Lists all invoices, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Invoice>, InvoiceRepoError> {
        let models = invoices::Entity::find()
            .order_by_asc(invoices::Column::Id)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let payments = load_payments(&self.db, model.id).await?;
            result.push(Invoice::new(InvoiceId::new(model.id), model.total, payments));
        }
        Ok(result)
    }

    /// Re-reads total and payments from the database.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice has been deleted.
    pub async fn reload(&self, invoice: &mut Invoice) -> Result<(), InvoiceRepoError> {
        let fresh = self.get(invoice.id()).await?;
        invoice.refresh(fresh.total(), fresh.payments().to_vec());
        Ok(())
    }

    /// Live remaining balance in dollars, summed from stored payments.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    pub async fn amount_owed(&self, id: InvoiceId) -> Result<Decimal, InvoiceRepoError> {
        let model = invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;
        let paid = paid_cents(&self.db, model.id).await?;

        Ok(to_dollars(InvoiceService::remaining(model.total, paid)))
    }

    /// True once the live remaining balance is zero or negative.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    pub async fn fully_paid(&self, id: InvoiceId) -> Result<bool, InvoiceRepoError> {
        Ok(self.amount_owed(id).await? <= Decimal::ZERO)
    }

    /// Changes the invoice total, applying the same normalization as creation.
    ///
    /// Returns `Ok(false)` and fills `invoice.errors()` if the new total is invalid.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice has been deleted, or a database error.
    pub async fn update_total(
        &self,
        invoice: &mut Invoice,
        total: Decimal,
    ) -> Result<bool, InvoiceRepoError> {
        invoice.errors_mut().clear();

        let new_invoice = match NewInvoice::build(Some(total)) {
            Ok(new_invoice) => new_invoice,
            Err(errors) => {
                invoice.errors_mut().merge(errors);
                return Ok(false);
            }
        };

        let txn = self.db.begin().await?;

        let model = invoices::Entity::find_by_id(invoice.id().into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(InvoiceRepoError::NotFound(invoice.id()))?;

        let mut active: invoices::ActiveModel = model.into();
        active.total = Set(new_invoice.total);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;

        txn.commit().await?;

        info!(
            invoice_id = %invoice.id(),
            total_cents = new_invoice.total,
            "Invoice total updated"
        );
        invoice.set_total(new_invoice.total);
        Ok(true)
    }

    /// Records a payment of `amount` dollars against the invoice.
    ///
    /// Runs as one unit of work:
    /// 1. Rejects non-positive amounts before touching the database
    /// 2. Locks the invoice row (`SELECT ... FOR UPDATE`)
    /// 3. Re-reads the sum of existing payments under the lock
    /// 4. Rejects the payment if it alone exceeds the remaining balance
    /// 5. Validates and inserts the payment, then commits
    ///
    /// Business rule failures roll back, populate `invoice.errors()` and
    /// return `Ok(None)`. On success the invoice is refreshed from the locked
    /// snapshot, so its balance reflects every committed payment and no read
    /// happens after the commit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice has been deleted, or a database error.
    pub async fn record_payment(
        &self,
        invoice: &mut Invoice,
        amount: Decimal,
        method: &str,
    ) -> Result<Option<Payment>, InvoiceRepoError> {
        invoice.errors_mut().clear();

        if let Err(err) = InvoiceService::check_amount(amount) {
            warn!(invoice_id = %invoice.id(), %amount, "Payment rejected: {err}");
            invoice.errors_mut().merge(err.into_validation_errors());
            return Ok(None);
        }

        let txn = self.db.begin().await?;

        let locked = invoices::Entity::find_by_id(invoice.id().into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(InvoiceRepoError::NotFound(invoice.id()))?;

        let paid = paid_cents(&txn, locked.id).await?;

        let new_payment = match InvoiceService::authorize_payment(
            invoice.id(),
            locked.total,
            paid,
            amount,
            method,
        ) {
            Ok(new_payment) => new_payment,
            Err(err) => {
                txn.rollback().await?;
                warn!(invoice_id = %invoice.id(), %amount, method, "Payment rejected: {err}");
                invoice.errors_mut().merge(err.into_validation_errors());
                return Ok(None);
            }
        };

        let payment = insert_payment(&txn, new_payment).await?;
        let payments = load_payments(&txn, locked.id).await?;
        txn.commit().await?;

        info!(
            invoice_id = %invoice.id(),
            payment_id = %payment.id(),
            amount_cents = payment.amount(),
            method = %payment.method(),
            "Payment recorded"
        );

        invoice.refresh(locked.total, payments);
        Ok(Some(payment))
    }

    /// Creates a payment directly, validating amount and method but without
    /// the overpayment guard.
    ///
    /// Used for imports and fixtures; this is the only way an invoice can
    /// become overpaid.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a non-positive amount or unknown method,
    /// `NotFound` if the invoice does not exist.
    pub async fn create_payment(
        &self,
        invoice_id: InvoiceId,
        amount_cents: i64,
        method: &str,
    ) -> Result<Payment, InvoiceRepoError> {
        let new_payment = NewPayment::build(invoice_id, amount_cents, method)
            .map_err(InvoiceRepoError::Validation)?;

        let txn = self.db.begin().await?;

        invoices::Entity::find_by_id(invoice_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(InvoiceRepoError::NotFound(invoice_id))?;

        let payment = insert_payment(&txn, new_payment).await?;
        txn.commit().await?;

        info!(
            invoice_id = %invoice_id,
            payment_id = %payment.id(),
            amount_cents = payment.amount(),
            "Payment created without balance check"
        );
        Ok(payment)
    }

    /// Payments for an invoice in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn payments(&self, invoice_id: InvoiceId) -> Result<Vec<Payment>, InvoiceRepoError> {
        load_payments(&self.db, invoice_id.into_inner()).await
    }

    /// Deletes an invoice and all of its payments in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist.
    pub async fn delete(&self, id: InvoiceId) -> Result<(), InvoiceRepoError> {
        let txn = self.db.begin().await?;

        invoices::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(InvoiceRepoError::NotFound(id))?;

        let removed = payments::Entity::delete_many()
            .filter(payments::Column::InvoiceId.eq(id.into_inner()))
            .exec(&txn)
            .await?;

        invoices::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(invoice_id = %id, payments = removed.rows_affected, "Invoice deleted");
        Ok(())
    }
}

/// Sum of payment amounts for an invoice, in cents.
async fn paid_cents<C: ConnectionTrait>(conn: &C, invoice_id: i64) -> Result<i64, DbErr> {
    let amounts: Vec<i64> = payments::Entity::find()
        .select_only()
        .column(payments::Column::Amount)
        .filter(payments::Column::InvoiceId.eq(invoice_id))
        .into_tuple::<i64>()
        .all(conn)
        .await?;

    Ok(amounts.into_iter().sum())
}

/// Loads payments for an invoice in id (creation) order.
async fn load_payments<C: ConnectionTrait>(
    conn: &C,
    invoice_id: i64,
) -> Result<Vec<Payment>, InvoiceRepoError> {
    payments::Entity::find()
        .filter(payments::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(payments::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(payment_from_model)
        .collect()
}

fn payment_from_model(model: payments::Model) -> Result<Payment, InvoiceRepoError> {
    let payment_id = PaymentId::new(model.id);
    Payment::from_record(
        payment_id,
        InvoiceId::new(model.invoice_id),
        model.amount,
        model.method_id,
    )
    .map_err(|errors| InvoiceRepoError::InvalidRecord { payment_id, errors })
}

async fn insert_payment<C: ConnectionTrait>(
    conn: &C,
    new_payment: NewPayment,
) -> Result<Payment, DbErr> {
    let model = payments::ActiveModel {
        invoice_id: Set(new_payment.invoice_id.into_inner()),
        amount: Set(new_payment.amount),
        method_id: Set(new_payment.method_id()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(new_payment.into_payment(PaymentId::new(model.id)))
}
