/// Payment methods ("egresos"). The first entry is the form default.
pub const PAYMENT_METHODS: &[&str] = &["Deuda Juanis", "Diners", "Efectivo", "Mastercard", "Visa"];

pub const CATEGORIES: &[&str] = &[
    "Ahorro",
    "Comida Afuera",
    "Formacion",
    "Inversión",
    "Mascotas",
    "Ocio",
    "Personales",
    "Préstamo dinero",
    "Regalos",
    "Salud",
    "Servicio Básico",
    "Supermercado",
    "Trabajo",
    "Transporte",
    "Vacaciones",
    "Vivienda",
];

pub const RESPONSIBLES: &[&str] = &["Alejo", "Joha"];

/// A fixed, ordered, closed set of values for one selector field.
#[derive(Debug, Clone, Copy)]
pub struct OptionSet {
    pub label: &'static str,
    pub values: &'static [&'static str],
}

pub const PAYMENT_OPTIONS: OptionSet = OptionSet {
    label: "payment method",
    values: PAYMENT_METHODS,
};

pub const CATEGORY_OPTIONS: OptionSet = OptionSet {
    label: "category",
    values: CATEGORIES,
};

pub const RESPONSIBLE_OPTIONS: OptionSet = OptionSet {
    label: "responsible",
    values: RESPONSIBLES,
};

impl OptionSet {
    pub fn default_value(&self) -> &'static str {
        self.values[0]
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| *v == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.position(value).is_some()
    }

    /// Case-insensitive lookup returning the canonical spelling, for CLI input.
    pub fn resolve(&self, input: &str) -> Option<&'static str> {
        let needle = input.trim().to_lowercase();
        self.values
            .iter()
            .find(|v| v.to_lowercase() == needle)
            .copied()
    }
}
