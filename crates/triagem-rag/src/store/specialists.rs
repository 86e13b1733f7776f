use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Specialist;

/// Directory of available specialists, in insertion order.
///
/// The classification label arriving at `match_label` is language-model
/// output: free text with unpredictable casing and word forms. Matching is
/// therefore case-insensitive substring containment rather than equality —
/// "cardiologia" has to find a directory entry labeled "Cardiologista".
pub struct SpecialistDirectory {
    specialists: Vec<Specialist>,
}

impl SpecialistDirectory {
    pub fn from_rows(specialists: Vec<Specialist>) -> Self {
        Self { specialists }
    }

    /// Load the directory from its CSV source. An empty file is fatal: a
    /// clinic with no specialists cannot recommend anyone.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::Ingest(format!("cannot read {}: {}", path.display(), e)))?;

        let mut specialists = Vec::new();
        for row in reader.deserialize::<Specialist>() {
            let specialist =
                row.map_err(|e| Error::Ingest(format!("{}: {}", path.display(), e)))?;
            specialists.push(specialist);
        }

        if specialists.is_empty() {
            return Err(Error::Ingest(format!(
                "no specialists found in {}",
                path.display()
            )));
        }

        tracing::info!(specialists = specialists.len(), "specialist directory ready");
        Ok(Self::from_rows(specialists))
    }

    /// Match a (normalized) specialty label against the directory.
    ///
    /// Returns entries whose specialty field contains the lowercased label
    /// as a substring, in insertion order. An empty label or a label with
    /// no containment yields an empty list, never an error.
    pub fn match_label(&self, label: &str) -> Vec<&Specialist> {
        let needle = label.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.specialists
            .iter()
            .filter(|s| s.specialty.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.specialists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specialists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specialist(name: &str, specialty: &str) -> Specialist {
        Specialist {
            name: name.to_string(),
            specialty: specialty.to_string(),
            department: "Unidade Central".to_string(),
            address: "Rua das Clínicas, 10".to_string(),
            contact: "contato@clinica.example".to_string(),
            phone: "(11) 3333-0000".to_string(),
        }
    }

    fn directory() -> SpecialistDirectory {
        SpecialistDirectory::from_rows(vec![
            specialist("Dra. Helena Prado", "Cardiologista"),
            specialist("Dr. Jorge Lins", "Cardiologia Pediátrica"),
            specialist("Dra. Marta Souza", "Dermatologia"),
        ])
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let dir = directory();
        let hits = dir.match_label("cardio");
        assert_eq!(hits.len(), 2);
        // Insertion order, not relevance order
        assert_eq!(hits[0].name, "Dra. Helena Prado");
        assert_eq!(hits[1].name, "Dr. Jorge Lins");
    }

    #[test]
    fn test_match_label_with_different_word_form() {
        let dir = directory();
        let hits = dir.match_label("Cardiologia");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].specialty, "Cardiologia Pediátrica");
    }

    #[test]
    fn test_empty_label_matches_nothing() {
        let dir = directory();
        assert!(dir.match_label("").is_empty());
        assert!(dir.match_label("   ").is_empty());
    }

    #[test]
    fn test_unknown_label_is_empty_not_error() {
        let dir = directory();
        assert!(dir.match_label("neurologia").is_empty());
    }

    #[test]
    fn test_load_csv_keeps_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medicos.csv");
        std::fs::write(
            &path,
            "Nome,Especialidade,Lotação,Endereço,Contato,Telefone\n\
             Dra. Helena Prado,Cardiologista,Unidade Central,Av. Paulista 1000,helena@clinica.example,(11) 3333-0001\n\
             Dr. Caio Nunes,Ortopedia,Unidade Norte,Rua B 20,caio@clinica.example,(11) 3333-0002\n",
        )
        .unwrap();

        let loaded = SpecialistDirectory::load_csv(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        let hits = loaded.match_label("ortopedia");
        assert_eq!(hits[0].name, "Dr. Caio Nunes");
    }

    #[test]
    fn test_load_csv_empty_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medicos.csv");
        std::fs::write(&path, "Nome,Especialidade,Lotação,Endereço,Contato,Telefone\n").unwrap();
        assert!(matches!(
            SpecialistDirectory::load_csv(&path),
            Err(Error::Ingest(_))
        ));
    }
}
