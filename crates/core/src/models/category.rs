//! Medical specialization categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Fixed set of specializations a doctor can be listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Cardiology,
    Neurology,
    Orthopedics,
    Pediatrics,
    Dermatology,
    Gynecology,
    Ophthalmology,
    Ent,
    Psychiatry,
    Oncology,
    Dentistry,
    GeneralMedicine,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Cardiology => "Cardiology",
            Category::Neurology => "Neurology",
            Category::Orthopedics => "Orthopedics",
            Category::Pediatrics => "Pediatrics",
            Category::Dermatology => "Dermatology",
            Category::Gynecology => "Gynecology",
            Category::Ophthalmology => "Ophthalmology",
            Category::Ent => "ENT",
            Category::Psychiatry => "Psychiatry",
            Category::Oncology => "Oncology",
            Category::Dentistry => "Dentistry",
            Category::GeneralMedicine => "General Medicine",
        }
    }

    /// All categories in display order (the filter chips)
    pub fn all() -> &'static [Category] {
        &[
            Category::Cardiology,
            Category::Neurology,
            Category::Orthopedics,
            Category::Pediatrics,
            Category::Dermatology,
            Category::Gynecology,
            Category::Ophthalmology,
            Category::Ent,
            Category::Psychiatry,
            Category::Oncology,
            Category::Dentistry,
            Category::GeneralMedicine,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts the field name ("Cardiology") as well as the practitioner
    /// form ("Cardiologist"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        let category = match normalized.as_str() {
            "cardiology" | "cardiologist" => Category::Cardiology,
            "neurology" | "neurologist" => Category::Neurology,
            "orthopedics" | "orthopaedics" | "orthopedic" | "orthopedist" => {
                Category::Orthopedics
            }
            "pediatrics" | "paediatrics" | "pediatrician" => Category::Pediatrics,
            "dermatology" | "dermatologist" => Category::Dermatology,
            "gynecology" | "gynaecology" | "gynecologist" => Category::Gynecology,
            "ophthalmology" | "ophthalmologist" => Category::Ophthalmology,
            "ent" | "otolaryngology" | "otolaryngologist" => Category::Ent,
            "psychiatry" | "psychiatrist" => Category::Psychiatry,
            "oncology" | "oncologist" => Category::Oncology,
            "dentistry" | "dentist" | "dental" => Category::Dentistry,
            "generalmedicine" | "generalphysician" | "general" => Category::GeneralMedicine,
            _ => return Err(Error::Decode(format!("unknown category: {}", s))),
        };
        Ok(category)
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_and_practitioner_forms() {
        assert_eq!("Cardiology".parse::<Category>().unwrap(), Category::Cardiology);
        assert_eq!("cardiologist".parse::<Category>().unwrap(), Category::Cardiology);
        assert_eq!("Neurologist".parse::<Category>().unwrap(), Category::Neurology);
        assert_eq!("General Medicine".parse::<Category>().unwrap(), Category::GeneralMedicine);
        assert_eq!("E.N.T".parse::<Category>().unwrap(), Category::Ent);
    }

    #[test]
    fn test_unknown_category_is_decode_error() {
        let err = "Astrology".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_display_parses_back() {
        for category in Category::all() {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), *category);
        }
    }
}
