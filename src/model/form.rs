use serde::Serialize;

use super::equipment::{EquipmentId, EquipmentRecord};

/// Whether submitting the form creates a new record or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit(EquipmentId),
}

/// Editable fields of the equipment form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    PartCode,
    Price,
    InStock,
    LastServiced,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[
            Self::Name,
            Self::PartCode,
            Self::Price,
            Self::InStock,
            Self::LastServiced,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::PartCode => "Part Code",
            Self::Price => "Price",
            Self::InStock => "In Stock",
            Self::LastServiced => "Last Serviced",
        }
    }
}

/// A replacement value for exactly one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    PartCode(String),
    /// Raw price text; parsed only when the form is submitted.
    Price(String),
    InStock(bool),
    LastServiced(String),
}

/// Request body for create and update calls.
///
/// `price` is NaN when the entered text has no numeric prefix; it is sent
/// as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: String,
    pub part_code: String,
    pub price: f64,
    pub in_stock: bool,
    pub last_serviced: String,
}

/// Field values of the record being created or edited, plus the form mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    name: String,
    part_code: String,
    price: String,
    in_stock: bool,
    last_serviced: String,
    mode: FormMode,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// An empty form in create mode. New equipment is in stock by default.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            part_code: String::new(),
            price: String::new(),
            in_stock: true,
            last_serviced: String::new(),
            mode: FormMode::Create,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The id being edited, or `None` in create mode.
    pub fn edit_id(&self) -> Option<&EquipmentId> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    /// Current display text of a field. In Stock renders as `Yes`/`No`.
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::PartCode => &self.part_code,
            Field::Price => &self.price,
            Field::InStock => {
                if self.in_stock {
                    "Yes"
                } else {
                    "No"
                }
            }
            Field::LastServiced => &self.last_serviced,
        }
    }

    /// Replaces a single field. No validation; the mode is unchanged.
    pub fn set_field(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(v) => self.name = v,
            FieldUpdate::PartCode(v) => self.part_code = v,
            FieldUpdate::Price(v) => self.price = v,
            FieldUpdate::InStock(v) => self.in_stock = v,
            FieldUpdate::LastServiced(v) => self.last_serviced = v,
        }
    }

    /// Appends a character to a text field. No-op for In Stock.
    pub fn push_char(&mut self, field: Field, ch: char) {
        if let Some(text) = self.text_mut(field) {
            text.push(ch);
        }
    }

    /// Removes the last character of a text field. No-op for In Stock.
    pub fn pop_char(&mut self, field: Field) {
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    pub fn toggle_in_stock(&mut self) {
        self.set_field(FieldUpdate::InStock(!self.in_stock));
    }

    /// Copies every field of `record` into the form and switches to edit
    /// mode for its id. Replaces any edit already in progress.
    pub fn load_for_edit(&mut self, record: &EquipmentRecord) {
        self.name = record.name.clone();
        self.part_code = record.part_code.clone();
        self.price = record.price.map(|p| p.to_string()).unwrap_or_default();
        self.in_stock = record.in_stock;
        self.last_serviced = record.last_serviced.clone().unwrap_or_default();
        self.mode = FormMode::Edit(record.id.clone());
    }

    /// Resets all fields to their defaults and returns to create mode.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Snapshot of the current values as a request body.
    pub fn to_submission(&self) -> Submission {
        Submission {
            name: self.name.clone(),
            part_code: self.part_code.clone(),
            price: parse_price(&self.price),
            in_stock: self.in_stock,
            last_serviced: self.last_serviced.clone(),
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::PartCode => Some(&mut self.part_code),
            Field::Price => Some(&mut self.price),
            Field::InStock => None,
            Field::LastServiced => Some(&mut self.last_serviced),
        }
    }
}

/// Parses the leading decimal number of `text`, ignoring anything after it.
///
/// Leading whitespace is skipped. Returns NaN when there is no numeric
/// prefix at all; invalid prices are passed on rather than rejected.
pub fn parse_price(text: &str) -> f64 {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;
    let mut number = String::new();

    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        number.push(sign as char);
        pos += 1;
    }

    let int_digits = count_digits(&bytes[pos..]);
    push_ascii(&mut number, &bytes[pos..pos + int_digits]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(&bytes[pos + 1..]);
        if frac_digits > 0 {
            if int_digits == 0 {
                number.push('0');
            }
            number.push('.');
            push_ascii(&mut number, &bytes[pos + 1..pos + 1 + frac_digits]);
            pos += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_start = pos + 1;
        let exp_sign = match bytes.get(exp_start) {
            Some(&sign @ (b'+' | b'-')) => {
                exp_start += 1;
                Some(sign as char)
            }
            _ => None,
        };
        let exp_digits = count_digits(&bytes[exp_start..]);
        if exp_digits > 0 {
            number.push('e');
            if let Some(sign) = exp_sign {
                number.push(sign);
            }
            push_ascii(&mut number, &bytes[exp_start..exp_start + exp_digits]);
        }
    }

    number.parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn push_ascii(out: &mut String, bytes: &[u8]) {
    out.extend(bytes.iter().map(|&b| b as char));
}
