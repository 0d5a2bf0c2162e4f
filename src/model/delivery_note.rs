use crate::error::{fail, ErrorType};
use crate::form::{Draft, Formable};
use crate::model::{parse_date, parse_enum, parse_field, validation_message, Amount, Item, Items};
use crate::store::Record;
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Payment methods offered by the surat jalan form. Other text is accepted too.
pub const PAYMENT_METHODS: [&str; 4] = ["Cash", "Transfer Bank", "Credit", "Cheque"];

/// Material names offered by the surat jalan form.
pub const MATERIAL_OPTIONS: [&str; 5] = [
    "Pipa PVC 3 inch",
    "Pipa PVC 4 inch",
    "Elbow PVC",
    "Tee PVC",
    "Socket PVC",
];

/// Units offered by the surat jalan form.
pub const UNIT_OPTIONS: [&str; 5] = ["meter", "pcs", "kg", "liter", "box"];

/// A surat jalan: the document that travels with a shipment.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeliveryNote {
    pub(crate) id: u64,
    pub(crate) number: String,
    pub(crate) date: NaiveDate,
    #[serde(default)]
    pub(crate) payment: String,
    #[serde(default)]
    pub(crate) status: DeliveryStatus,
    #[serde(default)]
    pub(crate) materials: Items<SjMaterial>,
    /// Only recomputed on save, so seeded or imported notes may carry a total that disagrees with
    /// their materials.
    #[serde(default)]
    pub(crate) total: Amount,
}

impl DeliveryNote {
    /// A surat jalan may have its material list emptied.
    pub const MIN_MATERIALS: usize = 0;

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn payment(&self) -> &str {
        &self.payment
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn materials(&self) -> &Items<SjMaterial> {
        &self.materials
    }

    pub fn total(&self) -> Amount {
        self.total
    }
}

/// Σ(qty × price) over `materials`, reading both as leading integers.
pub fn compute_total(materials: &Items<SjMaterial>) -> Amount {
    let total = materials.data().iter().fold(0i64, |acc, m| {
        acc.saturating_add(leading_int(&m.qty).saturating_mul(leading_int(&m.price)))
    });
    Amount::new(total)
}

/// Reads the integer at the start of `text`: optional whitespace and sign, then digits. Anything
/// without leading digits is `0`, so `"12abc"` is 12, `"1.5"` is 1 and `"abc"` is 0.
pub fn leading_int(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let value = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Draft,
    Sent,
    Delivered,
    Completed,
}

serde_plain::derive_display_from_serialize!(DeliveryStatus);
serde_plain::derive_fromstr_from_deserialize!(DeliveryStatus);

/// One material row on a surat jalan. Quantity and price stay as typed.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SjMaterial {
    pub(crate) id: u64,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) qty: String,
    #[serde(default)]
    pub(crate) unit: String,
    #[serde(default)]
    pub(crate) price: String,
}

impl SjMaterial {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qty(&self) -> &str {
        &self.qty
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn price(&self) -> &str {
        &self.price
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SjMaterialField {
    #[serde(alias = "material", alias = "nama_material")]
    Name,
    Qty,
    #[serde(alias = "satuan")]
    Unit,
    #[serde(alias = "harga")]
    Price,
}

serde_plain::derive_fromstr_from_deserialize!(SjMaterialField);

impl Item for SjMaterial {
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
        let value = value.to_string();
        match parse_field::<SjMaterialField>(name)? {
            SjMaterialField::Name => self.name = value,
            SjMaterialField::Qty => self.qty = value,
            SjMaterialField::Unit => self.unit = value,
            SjMaterialField::Price => self.price = value,
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeliveryNoteUpdates {
    pub number: Option<String>,
    pub date: Option<NaiveDate>,
    pub payment: Option<String>,
    pub status: Option<DeliveryStatus>,
    pub materials: Option<Items<SjMaterial>>,
    pub total: Option<Amount>,
}

impl Record for DeliveryNote {
    type Updates = DeliveryNoteUpdates;
    const KIND: &'static str = "surat jalan";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn apply(&mut self, updates: DeliveryNoteUpdates) {
        if let Some(number) = updates.number {
            self.number = number;
        }
        if let Some(date) = updates.date {
            self.date = date;
        }
        if let Some(payment) = updates.payment {
            self.payment = payment;
        }
        if let Some(status) = updates.status {
            self.status = status;
        }
        if let Some(materials) = updates.materials {
            self.materials = materials;
        }
        if let Some(total) = updates.total {
            self.total = total;
        }
    }

    fn into_updates(self) -> DeliveryNoteUpdates {
        DeliveryNoteUpdates {
            number: Some(self.number),
            date: Some(self.date),
            payment: Some(self.payment),
            status: Some(self.status),
            materials: Some(self.materials),
            total: Some(self.total),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DeliveryNoteField {
    #[serde(alias = "no_sj", alias = "sj")]
    Number,
    #[serde(alias = "tanggal")]
    Date,
    #[serde(alias = "pembayaran")]
    Payment,
    Status,
}

serde_plain::derive_fromstr_from_deserialize!(DeliveryNoteField);

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeliveryNoteDraft {
    pub number: String,
    pub date: String,
    pub payment: String,
    pub status: DeliveryStatus,
    pub materials: Items<SjMaterial>,
}

impl Draft for DeliveryNoteDraft {
    fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        match parse_field::<DeliveryNoteField>(name)? {
            DeliveryNoteField::Number => self.number = value.to_string(),
            DeliveryNoteField::Date => self.date = value.to_string(),
            DeliveryNoteField::Payment => self.payment = value.to_string(),
            DeliveryNoteField::Status => self.status = parse_enum("status", value)?,
        }
        Ok(())
    }

    fn add_item(&mut self) -> Result<u64> {
        self.materials.add()
    }

    fn remove_item(&mut self, id: u64) -> Result<()> {
        self.materials.remove(id, DeliveryNote::MIN_MATERIALS).map(|_| ())
    }

    fn set_item_field(&mut self, id: u64, name: &str, value: &str) -> Result<()> {
        self.materials.set(id, name, value)
    }
}

impl Display for DeliveryNoteDraft {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "No SJ *:    {}", self.number)?;
        writeln!(f, "Tanggal *:  {}", self.date)?;
        writeln!(
            f,
            "Pembayaran: {}{}",
            self.payment,
            hint(&self.payment, &PAYMENT_METHODS)
        )?;
        writeln!(f, "Status:     {}", self.status)?;
        write!(f, "Materials:")?;
        for m in self.materials.data() {
            write!(
                f,
                "\n  #{} material={} qty={} satuan={} harga={}",
                m.id, m.name, m.qty, m.unit, m.price
            )?;
        }
        if !self.materials.data().is_empty() {
            write!(
                f,
                "\n  pilihan material: {}\n  pilihan satuan: {}",
                MATERIAL_OPTIONS.join(", "),
                UNIT_OPTIONS.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Lists the suggested values after a field whose value is not one of them.
fn hint(value: &str, options: &[&str]) -> String {
    if options.contains(&value) {
        String::new()
    } else {
        format!(" ({})", options.join(" / "))
    }
}

impl Formable for DeliveryNote {
    type Draft = DeliveryNoteDraft;
    const CREATE_TITLE: &'static str = "Create Surat Jalan";
    const EDIT_TITLE: &'static str = "Edit Surat Jalan";
    const VIEW_TITLE: &'static str = "View Surat Jalan";

    fn blank_draft() -> DeliveryNoteDraft {
        DeliveryNoteDraft {
            number: String::new(),
            date: String::new(),
            payment: String::new(),
            status: DeliveryStatus::Draft,
            materials: Items::new(vec![SjMaterial::blank(1)]),
        }
    }

    fn to_draft(&self) -> DeliveryNoteDraft {
        DeliveryNoteDraft {
            number: self.number.clone(),
            date: self.date.to_string(),
            payment: self.payment.clone(),
            status: self.status,
            materials: self.materials.clone(),
        }
    }

    fn from_draft(draft: &DeliveryNoteDraft) -> Result<Self> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        if draft.number.trim().is_empty() {
            missing.push("number");
        }
        let date = parse_date("date", &draft.date, &mut missing, &mut invalid);

        match date {
            Some(date) if missing.is_empty() => Ok(DeliveryNote {
                id: 0,
                number: draft.number.clone(),
                date,
                payment: draft.payment.clone(),
                status: draft.status,
                materials: draft.materials.clone(),
                total: compute_total(&draft.materials),
            }),
            _ => fail!(
                ErrorType::Validation,
                "{}",
                validation_message(&missing, &invalid)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(id: u64, qty: &str, price: &str) -> SjMaterial {
        SjMaterial {
            id,
            name: "Pipa PVC 3 inch".to_string(),
            qty: qty.to_string(),
            unit: "meter".to_string(),
            price: price.to_string(),
        }
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("100"), 100);
        assert_eq!(leading_int("  42 pcs"), 42);
        assert_eq!(leading_int("12abc"), 12);
        assert_eq!(leading_int("1.5"), 1);
        assert_eq!(leading_int("-3"), -3);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int(""), 0);
    }

    #[test]
    fn test_compute_total() {
        let items = Items::new(vec![material(1, "100", "50000")]);
        assert_eq!(compute_total(&items), Amount::new(5_000_000));

        let items = Items::new(vec![material(1, "100", "50000"), material(2, "4", "12500")]);
        assert_eq!(compute_total(&items), Amount::new(5_050_000));
    }

    #[test]
    fn test_compute_total_empty_and_blank() {
        assert_eq!(compute_total(&Items::default()), Amount::ZERO);
        let items = Items::new(vec![SjMaterial::blank(1), material(2, "", "9000")]);
        assert_eq!(compute_total(&items), Amount::ZERO);
    }

    #[test]
    fn test_blank_draft() {
        let draft = DeliveryNote::blank_draft();
        assert_eq!(draft.status, DeliveryStatus::Draft);
        assert_eq!(draft.materials.len(), 1);
    }

    #[test]
    fn test_materials_can_be_emptied() {
        let mut draft = DeliveryNote::blank_draft();
        draft.remove_item(1).unwrap();
        assert!(draft.materials.is_empty());
        assert_eq!(draft.add_item().unwrap(), 1);
    }

    #[test]
    fn test_from_draft_recomputes_total() {
        let mut draft = DeliveryNote::blank_draft();
        draft.set_field("no_sj", "SJ-2024-003").unwrap();
        draft.set_field("tanggal", "2024-01-20").unwrap();
        draft.set_field("pembayaran", "Cash").unwrap();
        draft.set_item_field(1, "qty", "100").unwrap();
        draft.set_item_field(1, "harga", "50000").unwrap();
        let note = DeliveryNote::from_draft(&draft).unwrap();
        assert_eq!(note.total(), Amount::new(5_000_000));
        assert_eq!(note.status(), DeliveryStatus::Draft);
        assert_eq!(note.payment(), "Cash");
    }

    #[test]
    fn test_from_draft_requires_number_and_date() {
        let draft = DeliveryNote::blank_draft();
        let err = DeliveryNote::from_draft(&draft).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields: number, date"
        );
    }

    #[test]
    fn test_status_field() {
        let mut draft = DeliveryNote::blank_draft();
        draft.set_field("status", "completed").unwrap();
        assert_eq!(draft.status, DeliveryStatus::Completed);
        assert!(draft.set_field("status", "lost").is_err());
        assert_eq!(draft.status, DeliveryStatus::Completed);
    }

    #[test]
    fn test_draft_lists_suggestions() {
        let mut draft = DeliveryNote::blank_draft();
        let text = draft.to_string();
        assert!(text.contains("Pembayaran:  (Cash / Transfer Bank / Credit / Cheque)"));
        draft.set_field("payment", "Transfer Bank").unwrap();
        assert!(draft.to_string().contains("Pembayaran: Transfer Bank\n"));
        assert!(draft.to_string().contains("pilihan satuan: meter, pcs, kg, liter, box"));
        draft.set_field("payment", "Giro").unwrap();
        assert!(draft.to_string().contains("Pembayaran: Giro (Cash"));
    }
}
