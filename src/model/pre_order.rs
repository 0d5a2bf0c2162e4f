use crate::error::{fail, ErrorType};
use crate::form::{Draft, Formable};
use crate::model::{parse_date, parse_field, validation_message, Item, Items};
use crate::store::Record;
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A customer purchase order with the materials it requests.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PreOrder {
    pub(crate) id: u64,
    pub(crate) sales: String,
    pub(crate) customer: String,
    pub(crate) po_number: String,
    pub(crate) date: NaiveDate,
    #[serde(default)]
    pub(crate) materials: Items<PoMaterial>,
}

impl PreOrder {
    /// A pre-order must keep at least this many material rows.
    pub const MIN_MATERIALS: usize = 1;

    pub fn sales(&self) -> &str {
        &self.sales
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn po_number(&self) -> &str {
        &self.po_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn materials(&self) -> &Items<PoMaterial> {
        &self.materials
    }
}

/// One requested material on a pre-order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PoMaterial {
    pub(crate) id: u64,
    /// The surat jalan this material ships on.
    #[serde(default)]
    pub(crate) delivery_note: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) qty: Option<u64>,
    #[serde(default)]
    pub(crate) unit: Option<String>,
}

impl PoMaterial {
    pub fn delivery_note(&self) -> &str {
        &self.delivery_note
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qty(&self) -> Option<u64> {
        self.qty
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PoMaterialField {
    #[serde(alias = "sj", alias = "no_surat_jalan")]
    DeliveryNote,
    #[serde(alias = "material", alias = "nama_material")]
    Name,
    Qty,
    #[serde(alias = "satuan")]
    Unit,
}

serde_plain::derive_fromstr_from_deserialize!(PoMaterialField);

impl Item for PoMaterial {
    const NAME: &'static str = "material";

    fn id(&self) -> u64 {
        self.id
    }

    fn blank(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match parse_field::<PoMaterialField>(name)? {
            PoMaterialField::DeliveryNote => self.delivery_note = value.to_string(),
            PoMaterialField::Name => self.name = value.to_string(),
            PoMaterialField::Qty => {
                self.qty = match value.trim() {
                    "" => None,
                    text => match text.parse() {
                        Ok(qty) => Some(qty),
                        Err(_) => fail!(ErrorType::Input, "Invalid qty '{value}'"),
                    },
                }
            }
            PoMaterialField::Unit => {
                self.unit = (!value.is_empty()).then(|| value.to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PreOrderUpdates {
    pub sales: Option<String>,
    pub customer: Option<String>,
    pub po_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub materials: Option<Items<PoMaterial>>,
}

impl Record for PreOrder {
    type Updates = PreOrderUpdates;
    const KIND: &'static str = "preorder";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn apply(&mut self, updates: PreOrderUpdates) {
        if let Some(sales) = updates.sales {
            self.sales = sales;
        }
        if let Some(customer) = updates.customer {
            self.customer = customer;
        }
        if let Some(po_number) = updates.po_number {
            self.po_number = po_number;
        }
        if let Some(date) = updates.date {
            self.date = date;
        }
        if let Some(materials) = updates.materials {
            self.materials = materials;
        }
    }

    fn into_updates(self) -> PreOrderUpdates {
        PreOrderUpdates {
            sales: Some(self.sales),
            customer: Some(self.customer),
            po_number: Some(self.po_number),
            date: Some(self.date),
            materials: Some(self.materials),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PreOrderField {
    Sales,
    Customer,
    #[serde(alias = "po", alias = "no_po")]
    PoNumber,
    #[serde(alias = "tanggal")]
    Date,
}

serde_plain::derive_fromstr_from_deserialize!(PreOrderField);

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PreOrderDraft {
    pub sales: String,
    pub customer: String,
    pub po_number: String,
    pub date: String,
    pub materials: Items<PoMaterial>,
}

impl Draft for PreOrderDraft {
    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match parse_field::<PreOrderField>(name)? {
            PreOrderField::Sales => self.sales = value.to_string(),
            PreOrderField::Customer => self.customer = value.to_string(),
            PreOrderField::PoNumber => self.po_number = value.to_string(),
            PreOrderField::Date => self.date = value.to_string(),
        }
        Ok(())
    }

    fn add_item(&mut self) -> Result<u64> {
        self.materials.add()
    }

    fn remove_item(&mut self, id: u64) -> Result<()> {
        self.materials.remove(id, PreOrder::MIN_MATERIALS).map(|_| ())
    }

    fn set_item_field(&mut self, id: u64, name: &str, value: &str) -> Result<()> {
        self.materials.set(id, name, value)
    }
}

impl Display for PreOrderDraft {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Sales *:    {}", self.sales)?;
        writeln!(f, "Tanggal *:  {}", self.date)?;
        writeln!(f, "No PO *:    {}", self.po_number)?;
        writeln!(f, "Customer *: {}", self.customer)?;
        write!(f, "Materials:")?;
        for m in self.materials.data() {
            write!(
                f,
                "\n  #{} sj={} material={} qty={} satuan={}",
                m.id,
                m.delivery_note,
                m.name,
                m.qty.map(|q| q.to_string()).unwrap_or_default(),
                m.unit.as_deref().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

impl Formable for PreOrder {
    type Draft = PreOrderDraft;
    const CREATE_TITLE: &'static str = "Create PreOrder";
    const EDIT_TITLE: &'static str = "Edit PreOrder";
    const VIEW_TITLE: &'static str = "View PreOrder";

    fn blank_draft() -> PreOrderDraft {
        PreOrderDraft {
            sales: String::new(),
            customer: String::new(),
            po_number: String::new(),
            date: String::new(),
            materials: Items::new(vec![PoMaterial::blank(1)]),
        }
    }

    fn to_draft(&self) -> PreOrderDraft {
        PreOrderDraft {
            sales: self.sales.clone(),
            customer: self.customer.clone(),
            po_number: self.po_number.clone(),
            date: self.date.to_string(),
            materials: self.materials.clone(),
        }
    }

    fn from_draft(draft: &PreOrderDraft) -> Result<Self> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        for (name, value) in [
            ("sales", &draft.sales),
            ("customer", &draft.customer),
            ("po_number", &draft.po_number),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        let date = parse_date("date", &draft.date, &mut missing, &mut invalid);

        match date {
            Some(date) if missing.is_empty() => Ok(PreOrder {
                id: 0,
                sales: draft.sales.clone(),
                customer: draft.customer.clone(),
                po_number: draft.po_number.clone(),
                date,
                materials: draft.materials.clone(),
            }),
            _ => fail!(
                ErrorType::Validation,
                "{}",
                validation_message(&missing, &invalid)
            ),
        }
    }
}
