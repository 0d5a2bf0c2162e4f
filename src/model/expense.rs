use crate::error::{fail, ErrorType};
use crate::form::{Draft, Formable};
use crate::model::{parse_date, parse_enum, parse_field, Amount};
use crate::store::Record;
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An operational expense ledger entry.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Expense {
    pub(crate) id: u64,
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) date: NaiveDate,
    #[serde(default)]
    pub(crate) category: Option<ExpenseCategory>,
    #[serde(default)]
    pub(crate) status: ExpenseStatus,
}

impl Expense {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> Option<ExpenseCategory> {
        self.category
    }

    pub fn status(&self) -> ExpenseStatus {
        self.status
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    #[default]
    Office,
    Utilities,
    Maintenance,
    Transport,
    Marketing,
}

serde_plain::derive_display_from_serialize!(ExpenseCategory);
serde_plain::derive_fromstr_from_deserialize!(ExpenseCategory);

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Office,
        ExpenseCategory::Utilities,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Transport,
        ExpenseCategory::Marketing,
    ];

    /// The label shown in tables and option lists.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Office => "Office Supplies",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Maintenance => "Maintenance",
            ExpenseCategory::Transport => "Transportation",
            ExpenseCategory::Marketing => "Marketing",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

serde_plain::derive_display_from_serialize!(ExpenseStatus);
serde_plain::derive_fromstr_from_deserialize!(ExpenseStatus);

/// Field changes for an `Expense`. `category` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdates {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub date: Option<NaiveDate>,
    pub category: Option<Option<ExpenseCategory>>,
    pub status: Option<ExpenseStatus>,
}

impl Record for Expense {
    type Updates = ExpenseUpdates;
    const KIND: &'static str = "expense";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn apply(&mut self, updates: ExpenseUpdates) {
        if let Some(description) = updates.description {
            self.description = description;
        }
        if let Some(amount) = updates.amount {
            self.amount = amount;
        }
        if let Some(date) = updates.date {
            self.date = date;
        }
        if let Some(category) = updates.category {
            self.category = category;
        }
        if let Some(status) = updates.status {
            self.status = status;
        }
    }

    fn into_updates(self) -> ExpenseUpdates {
        ExpenseUpdates {
            description: Some(self.description),
            amount: Some(self.amount),
            date: Some(self.date),
            category: Some(self.category),
            status: Some(self.status),
        }
    }
}

/// The fields of the expense form. Indonesian labels are accepted as aliases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ExpenseField {
    #[serde(alias = "keterangan")]
    Description,
    #[serde(alias = "jumlah")]
    Amount,
    #[serde(alias = "tanggal")]
    Date,
    #[serde(alias = "kategori")]
    Category,
    Status,
}

serde_plain::derive_fromstr_from_deserialize!(ExpenseField);

/// The expense form as typed: every field is text until the draft is saved.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category: String,
    pub status: ExpenseStatus,
}

impl Draft for ExpenseDraft {
    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match parse_field::<ExpenseField>(name)? {
            ExpenseField::Description => self.description = value.to_string(),
            ExpenseField::Amount => self.amount = value.to_string(),
            ExpenseField::Date => self.date = value.to_string(),
            ExpenseField::Category => {
                if !value.is_empty() {
                    let _: ExpenseCategory = parse_enum("category", value)?;
                }
                self.category = value.to_string();
            }
            ExpenseField::Status => self.status = parse_enum("status", value)?,
        }
        Ok(())
    }
}

impl Display for ExpenseDraft {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Keterangan *: {}", self.description)?;
        writeln!(f, "Jumlah *:     {}", self.amount)?;
        writeln!(f, "Tanggal *:    {}", self.date)?;
        writeln!(f, "Kategori:     {}", self.category)?;
        write!(f, "Status:       {}", self.status)
    }
}

impl Formable for Expense {
    type Draft = ExpenseDraft;
    const CREATE_TITLE: &'static str = "Add New Expense";
    const EDIT_TITLE: &'static str = "Edit Expense";
    const VIEW_TITLE: &'static str = "View Expense";

    fn blank_draft() -> ExpenseDraft {
        ExpenseDraft::default()
    }

    fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            amount: self.amount.plain(),
            date: self.date.to_string(),
            category: self.category.map(|c| c.to_string()).unwrap_or_default(),
            status: self.status,
        }
    }

    fn from_draft(draft: &ExpenseDraft) -> Result<Self> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        if draft.description.trim().is_empty() {
            missing.push("description");
        }
        let amount = if draft.amount.trim().is_empty() {
            missing.push("amount");
            None
        } else {
            match Amount::from_str(&draft.amount) {
                Ok(amount) => Some(amount),
                Err(e) => {
                    invalid.push(e.to_string());
                    None
                }
            }
        };
        let date = parse_date("date", &draft.date, &mut missing, &mut invalid);
        let category = if draft.category.is_empty() {
            None
        } else {
            Some(parse_enum::<ExpenseCategory>("category", &draft.category)?)
        };

        match (amount, date) {
            (Some(amount), Some(date)) if missing.is_empty() => Ok(Expense {
                id: 0,
                description: draft.description.clone(),
                amount,
                date,
                category,
                status: draft.status,
            }),
            _ => fail!(
                ErrorType::Validation,
                "{}",
                crate::model::validation_message(&missing, &invalid)
            ),
        }
    }
}
