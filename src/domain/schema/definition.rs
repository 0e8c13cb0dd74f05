//! Static field definitions: labels, preset choices, validators.
//!
//! The schema is fixed at startup. Fields with preset choices may allow a
//! "custom value" escape that routes the dialogue into free-text capture.

use once_cell::sync::Lazy;

use super::FieldKey;

/// Validation predicate with its user-facing rejection message.
#[derive(Clone, Copy)]
pub struct FieldValidator {
    check: fn(&str) -> bool,
    message: &'static str,
}

impl FieldValidator {
    /// Runs the predicate, returning the rejection message on failure.
    pub fn validate(&self, input: &str) -> Result<(), &'static str> {
        if (self.check)(input) {
            Ok(())
        } else {
            Err(self.message)
        }
    }
}

impl std::fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldValidator")
            .field("message", &self.message)
            .finish()
    }
}

/// One entry of the intake schema. Immutable, defined at startup.
#[derive(Debug, Clone, Copy)]
pub struct FieldDefinition {
    pub key: FieldKey,
    pub label: &'static str,
    /// Preset choices offered as buttons; empty for free-text fields.
    pub choices: &'static [&'static str],
    /// Whether a "custom value" escape is offered next to the choices.
    pub allows_custom: bool,
    pub validator: FieldValidator,
}

impl FieldDefinition {
    /// Returns true if this field offers preset choices.
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Returns true if `value` matches one of the preset choices.
    pub fn is_choice(&self, value: &str) -> bool {
        self.choices.iter().any(|c| *c == value)
    }

    /// Validates a free-text answer for this field.
    pub fn validate(&self, input: &str) -> Result<(), &'static str> {
        self.validator.validate(input)
    }
}

fn non_blank(input: &str) -> bool {
    !input.trim().is_empty()
}

// Amount fields accept "300", "300 EUR", "1x rent" style answers; the only
// hard requirement is a leading digit so obvious non-answers get re-prompted.
fn leading_amount(input: &str) -> bool {
    input.trim().starts_with(|c: char| c.is_ascii_digit())
}

const NON_BLANK: FieldValidator = FieldValidator {
    check: non_blank,
    message: "The value cannot be empty.",
};

const AMOUNT: FieldValidator = FieldValidator {
    check: leading_amount,
    message: "Please start with an amount, e.g. \"300\" or \"300 EUR\".",
};

static SCHEMA: Lazy<[FieldDefinition; 13]> = Lazy::new(|| {
    [
        FieldDefinition {
            key: FieldKey::Category,
            label: "Select the listing category:",
            choices: &["Rent", "Sale"],
            allows_custom: true,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::PropertyKind,
            label: "Select the property kind:",
            choices: &["Room", "Apartment", "House", "Commercial"],
            allows_custom: true,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::Street,
            label: "Enter the street:",
            choices: &[],
            allows_custom: false,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::City,
            label: "Enter the city:",
            choices: &[],
            allows_custom: false,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::District,
            label: "Enter the district:",
            choices: &[],
            allows_custom: false,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::Advantages,
            label: "List the advantages:",
            choices: &[],
            allows_custom: false,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::Rent,
            label: "Enter the rent:",
            choices: &[],
            allows_custom: false,
            validator: AMOUNT,
        },
        FieldDefinition {
            key: FieldKey::Deposit,
            label: "Enter the deposit:",
            choices: &[],
            allows_custom: false,
            validator: AMOUNT,
        },
        FieldDefinition {
            key: FieldKey::Commission,
            label: "Enter the commission:",
            choices: &[],
            allows_custom: false,
            validator: AMOUNT,
        },
        FieldDefinition {
            key: FieldKey::Parking,
            label: "Is parking available?",
            choices: &["Yes", "No"],
            allows_custom: true,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::MoveInFrom,
            label: "Move-in possible from:",
            choices: &[],
            allows_custom: false,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::ViewingsFrom,
            label: "Viewings possible from:",
            choices: &[],
            allows_custom: false,
            validator: NON_BLANK,
        },
        FieldDefinition {
            key: FieldKey::Broker,
            label: "Broker handle to show publicly:",
            choices: &[],
            allows_custom: false,
            validator: NON_BLANK,
        },
    ]
});

/// Returns the full schema in dialogue order.
pub fn ordered() -> &'static [FieldDefinition] {
    &*SCHEMA
}

/// Returns the definition for one field.
pub fn by_key(key: FieldKey) -> &'static FieldDefinition {
    &SCHEMA[key.order_index()]
}
