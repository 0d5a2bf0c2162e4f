//! Dashboard statistics computed from the current records.

use crate::model::{Amount, DeliveryNote, DeliveryStatus, Expense, ExpenseStatus, PreOrder};
use chrono::Datelike;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    total_pre_orders: usize,
    total_expenses: Amount,
    /// Line items across pre-orders and delivery notes.
    total_materials: usize,
    pending_expenses: usize,
    /// Delivery notes that are not completed.
    active_delivery_notes: usize,
    /// Year and month of the latest expense, if there is one.
    latest_month: Option<(i32, u32)>,
    latest_month_expenses: Amount,
}

impl Stats {
    pub fn compute(
        expenses: &[Expense],
        pre_orders: &[PreOrder],
        delivery_notes: &[DeliveryNote],
    ) -> Self {
        let latest_month = expenses
            .iter()
            .map(Expense::date)
            .max()
            .map(|d| (d.year(), d.month()));
        let latest_month_expenses = match latest_month {
            Some(month) => expenses
                .iter()
                .filter(|e| (e.date().year(), e.date().month()) == month)
                .map(Expense::amount)
                .sum(),
            None => Amount::ZERO,
        };
        Self {
            total_pre_orders: pre_orders.len(),
            total_expenses: expenses.iter().map(Expense::amount).sum(),
            total_materials: pre_orders.iter().map(|po| po.materials().len()).sum::<usize>()
                + delivery_notes
                    .iter()
                    .map(|sj| sj.materials().len())
                    .sum::<usize>(),
            pending_expenses: expenses
                .iter()
                .filter(|e| e.status() == ExpenseStatus::Pending)
                .count(),
            active_delivery_notes: delivery_notes
                .iter()
                .filter(|sj| sj.status() != DeliveryStatus::Completed)
                .count(),
            latest_month,
            latest_month_expenses,
        }
    }

    pub fn total_pre_orders(&self) -> usize {
        self.total_pre_orders
    }

    pub fn total_expenses(&self) -> Amount {
        self.total_expenses
    }

    pub fn total_materials(&self) -> usize {
        self.total_materials
    }

    pub fn pending_expenses(&self) -> usize {
        self.pending_expenses
    }

    pub fn active_delivery_notes(&self) -> usize {
        self.active_delivery_notes
    }

    pub fn latest_month_expenses(&self) -> Amount {
        self.latest_month_expenses
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total PreOrders: {}", self.total_pre_orders)?;
        writeln!(f, "Total Operasional Expenses: {}", self.total_expenses)?;
        writeln!(f, "Total Materials: {}", self.total_materials)?;
        writeln!(f, "Pending Expenses: {}", self.pending_expenses)?;
        write!(f, "Active Surat Jalan: {}", self.active_delivery_notes)?;
        if let Some((year, month)) = self.latest_month {
            write!(
                f,
                "\nExpenses in {month}/{year}: {}",
                self.latest_month_expenses
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dataset;
    use crate::test::expense;

    #[test]
    fn test_builtin_stats() {
        let data = Dataset::builtin().unwrap();
        let stats = Stats::compute(data.expenses(), data.pre_orders(), data.delivery_notes());
        assert_eq!(stats.total_pre_orders(), 2);
        assert_eq!(stats.total_expenses(), Amount::new(7_500_000));
        assert_eq!(stats.total_materials(), 3);
        assert_eq!(stats.pending_expenses(), 1);
        assert_eq!(stats.active_delivery_notes(), 2);
        assert_eq!(stats.latest_month_expenses(), Amount::new(7_500_000));
        assert!(stats
            .to_string()
            .ends_with("Expenses in 1/2024: Rp 7.500.000"));
    }

    #[test]
    fn test_latest_month_only() {
        let expenses = vec![
            expense(1, "Sewa", 1_000_000, "2024-01-31"),
            expense(2, "Bensin", 200_000, "2024-02-01"),
            expense(3, "Parkir", 50_000, "2024-02-20"),
        ];
        let stats = Stats::compute(&expenses, &[], &[]);
        assert_eq!(stats.latest_month_expenses(), Amount::new(250_000));
        assert_eq!(stats.total_expenses(), Amount::new(1_250_000));
    }

    #[test]
    fn test_empty() {
        let stats = Stats::compute(&[], &[], &[]);
        assert_eq!(stats.total_expenses(), Amount::ZERO);
        assert!(!stats.to_string().contains("Expenses in"));
    }
}
