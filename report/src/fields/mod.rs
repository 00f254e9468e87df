// Field store abstraction over the report page's form fields.
//
// The engine never talks to a real form directly; everything goes through
// the `FieldStore` trait so the propagation logic is testable headless.
// Writes to a field the page does not have are silent no-ops, matching how
// the page behaves when an element is absent.

pub mod ids;

use std::collections::HashMap;

/// Tick/cross indicator state next to a metric. `Blank` is the cleared
/// state used when the owning check is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Blank,
    Pass,
    Fail,
}

impl Indicator {
    /// Indicator for a server flag value. Only an exact (case-insensitive)
    /// "Yes" reads as a pass; anything else, including a missing flag, is a
    /// fail.
    pub fn from_flag(flag: &str) -> Indicator {
        if flag.trim().eq_ignore_ascii_case("yes") {
            Indicator::Pass
        } else {
            Indicator::Fail
        }
    }
}

pub trait FieldStore: Send + Sync {
    /// Current value of a field, `None` when the page has no such field.
    fn value(&self, id: &str) -> Option<String>;

    /// Write a field value. Returns false (and does nothing) when the field
    /// is absent.
    fn set_value(&mut self, id: &str, value: &str) -> bool;

    /// Whether the field is present but not editable.
    fn is_disabled(&self, id: &str) -> bool;

    /// Set a tick/cross indicator. Returns false when absent.
    fn set_indicator(&mut self, id: &str, state: Indicator) -> bool;

    fn indicator(&self, id: &str) -> Option<Indicator>;

    fn exists(&self, id: &str) -> bool {
        self.value(id).is_some()
    }

    fn clear(&mut self, id: &str) -> bool {
        self.set_value(id, "")
    }
}

#[derive(Debug, Clone)]
struct Field {
    value: String,
    disabled: bool,
}

/// HashMap-backed store seeded with the fields the page actually has.
#[derive(Debug, Clone, Default)]
pub struct MemoryFieldStore {
    fields: HashMap<String, Field>,
    indicators: HashMap<String, Indicator>,
}

impl MemoryFieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&mut self, id: &str, value: &str) {
        self.fields.insert(
            id.to_string(),
            Field { value: value.to_string(), disabled: false },
        );
    }

    pub fn insert_disabled_field(&mut self, id: &str, value: &str) {
        self.fields.insert(
            id.to_string(),
            Field { value: value.to_string(), disabled: true },
        );
    }

    pub fn insert_indicator(&mut self, id: &str) {
        self.indicators.entry(id.to_string()).or_insert(Indicator::Blank);
    }

    pub fn remove_field(&mut self, id: &str) {
        self.fields.remove(id);
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl FieldStore for MemoryFieldStore {
    fn value(&self, id: &str) -> Option<String> {
        self.fields.get(id).map(|f| f.value.clone())
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.fields.get_mut(id) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    fn is_disabled(&self, id: &str) -> bool {
        self.fields.get(id).map(|f| f.disabled).unwrap_or(false)
    }

    fn set_indicator(&mut self, id: &str, state: Indicator) -> bool {
        match self.indicators.get_mut(id) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    fn indicator(&self, id: &str) -> Option<Indicator> {
        self.indicators.get(id).copied()
    }
}
