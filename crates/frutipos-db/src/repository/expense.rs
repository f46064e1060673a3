//! # Expense Repository
//!
//! Append-only expense log.

use chrono::Utc;
use frutipos_core::types::new_id;
use frutipos_core::{Expense, ExpenseDraft};
use tracing::info;

use crate::error::DbResult;
use crate::store::{Collection, CollectionStore};

#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    store: CollectionStore,
}

impl ExpenseRepository {
    pub fn new(store: CollectionStore) -> Self {
        ExpenseRepository { store }
    }

    /// All expenses in the order they were recorded.
    pub async fn list(&self) -> DbResult<Vec<Expense>> {
        self.store.load(Collection::Expenses, Vec::new).await
    }

    /// All expenses, most recent first, as the ledger shows them.
    pub async fn list_newest_first(&self) -> DbResult<Vec<Expense>> {
        let mut expenses = self.list().await?;
        expenses.reverse();
        Ok(expenses)
    }

    /// Validates `draft` and records it now.
    pub async fn record(&self, draft: ExpenseDraft) -> DbResult<Expense> {
        let expense = draft.into_expense(new_id(), Utc::now())?;
        self.append(&expense).await?;

        info!(
            id = %expense.id,
            amount = %expense.amount_cents,
            kind = %expense.kind,
            "Expense recorded"
        );
        Ok(expense)
    }

    /// Appends an already built expense.
    pub async fn append(&self, expense: &Expense) -> DbResult<()> {
        let mut tx = self.store.begin().await?;
        let mut expenses: Vec<Expense> = tx.load(Collection::Expenses, Vec::new).await?;
        expenses.push(expense.clone());
        tx.save(Collection::Expenses, &expenses).await?;
        tx.commit().await
    }
}
