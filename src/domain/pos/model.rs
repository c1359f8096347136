//! Point-of-sale domain entity

use chrono::{DateTime, Utc};

/// Kind of point of sale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosType {
    Cafe,
    Bakery,
    Cafeteria,
    VendingMachine,
}

impl Default for PosType {
    fn default() -> Self {
        Self::Cafe
    }
}

impl std::fmt::Display for PosType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cafe => write!(f, "Cafe"),
            Self::Bakery => write!(f, "Bakery"),
            Self::Cafeteria => write!(f, "Cafeteria"),
            Self::VendingMachine => write!(f, "VendingMachine"),
        }
    }
}

impl std::str::FromStr for PosType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cafe" => Ok(Self::Cafe),
            "bakery" => Ok(Self::Bakery),
            "cafeteria" => Ok(Self::Cafeteria),
            "vendingmachine" | "vending_machine" => Ok(Self::VendingMachine),
            other => Err(format!("unknown point of sale type '{}'", other)),
        }
    }
}

/// Campus a point of sale is located on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Campus {
    Altstadt,
    Bergheim,
    InfNeuenheimerFeld,
}

impl Default for Campus {
    fn default() -> Self {
        Self::Altstadt
    }
}

impl std::fmt::Display for Campus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Altstadt => write!(f, "Altstadt"),
            Self::Bergheim => write!(f, "Bergheim"),
            Self::InfNeuenheimerFeld => write!(f, "InfNeuenheimerFeld"),
        }
    }
}

impl std::str::FromStr for Campus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "altstadt" => Ok(Self::Altstadt),
            "bergheim" => Ok(Self::Bergheim),
            "infneuenheimerfeld" | "inf" => Ok(Self::InfNeuenheimerFeld),
            other => Err(format!("unknown campus '{}'", other)),
        }
    }
}

/// A location or vendor that can be reviewed
#[derive(Debug, Clone, PartialEq)]
pub struct PointOfSale {
    /// `None` until persisted
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub pos_type: PosType,
    pub campus: Campus,
    pub street: String,
    pub house_number: String,
    pub postal_code: u32,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PointOfSale {
    pub fn new(name: impl Into<String>, pos_type: PosType, campus: Campus) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            pos_type,
            campus,
            street: String::new(),
            house_number: String::new(),
            postal_code: 0,
            city: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Placeholder carrying only an identifier, resolved by the service layer.
    pub fn reference(id: i64) -> Self {
        let mut pos = Self::new(String::new(), PosType::default(), Campus::default());
        pos.id = Some(id);
        pos
    }
}
