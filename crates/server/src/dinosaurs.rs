use serde::{Deserialize, Serialize};

const DATASET: &str = include_str!("../res/dinosaurs.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dinosaur {
    pub name: String,
    pub description: String,
}

/// The bundled dataset, in file order.
#[derive(Debug, Clone)]
pub struct DinosaurCatalog {
    records: Vec<Dinosaur>,
}

impl DinosaurCatalog {
    pub fn bundled() -> Result<Self, serde_json::Error> {
        Self::from_json(DATASET)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<Dinosaur> = serde_json::from_str(raw)?;
        Ok(Self { records })
    }

    pub fn all(&self) -> &[Dinosaur] {
        &self.records
    }

    /// Case-insensitive exact match, first hit wins.
    pub fn find(&self, name: &str) -> Option<&Dinosaur> {
        let wanted = name.to_lowercase();
        self.records
            .iter()
            .find(|d| d.name.to_lowercase() == wanted)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
