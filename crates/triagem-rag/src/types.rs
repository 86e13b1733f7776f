use serde::{Deserialize, Serialize};

/// A patient record loaded from the tabular corpus.
///
/// The identifier is an opaque token: `"007"` and `"7"` name different
/// patients, so it is never parsed as a number. Field names bind to the
/// Portuguese CSV headers produced by the upstream JSON-to-CSV conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(rename = "paciente")]
    pub identifier: String,
    #[serde(rename = "anamnese")]
    pub anamnesis: String,
    #[serde(rename = "laudo")]
    pub report: String,
}

/// A specialist contact record from the directory CSV.
///
/// The specialty field is free text, not an enum: the directory mixes
/// casing and word forms ("Cardiologia", "Cardiologista"), which is why
/// matching is substring-based.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialist {
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Especialidade")]
    pub specialty: String,
    #[serde(rename = "Lotação")]
    pub department: String,
    #[serde(rename = "Endereço")]
    pub address: String,
    #[serde(rename = "Contato")]
    pub contact: String,
    #[serde(rename = "Telefone")]
    pub phone: String,
}

/// A supporting passage returned by semantic retrieval. Ephemeral,
/// produced per query and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    /// Position in the ranked result list, 0 = most similar.
    pub rank: usize,
}

/// Which retrieval strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    IdMatch,
    SemanticMatch,
    NoMatch,
}

/// The assembled response for one question. Constructed once per request
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub mode: QueryMode,
    pub summary: Option<String>,
    pub specialty: Option<String>,
    pub specialists: Vec<Specialist>,
    pub answer: Option<String>,
}

impl QueryResult {
    /// Result for the exact-identifier path: report summary plus the
    /// specialists matched against the classified specialty.
    pub fn id_match(summary: String, specialty: String, specialists: Vec<Specialist>) -> Self {
        Self {
            mode: QueryMode::IdMatch,
            summary: Some(summary),
            specialty: Some(specialty),
            specialists,
            answer: None,
        }
    }

    /// Result for the semantic path: grounded answer plus specialty match.
    pub fn semantic(answer: String, specialty: String, specialists: Vec<Specialist>) -> Self {
        Self {
            mode: QueryMode::SemanticMatch,
            summary: None,
            specialty: Some(specialty),
            specialists,
            answer: Some(answer),
        }
    }

    /// Result assembled when no route produced a hit.
    pub fn no_match() -> Self {
        Self {
            mode: QueryMode::NoMatch,
            summary: None,
            specialty: None,
            specialists: Vec::new(),
            answer: None,
        }
    }

    /// Render the user-facing answer body: the synthesized answer or the
    /// report summary, followed by the specialist list (or the explicit
    /// "none found" line — an empty match is a valid outcome, not an error).
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        match (&self.answer, &self.summary) {
            (Some(answer), _) => out.push_str(answer),
            (None, Some(summary)) => {
                out.push_str("Resumo do laudo:\n");
                out.push_str(summary);
            }
            (None, None) => out.push_str("Nenhuma resposta disponível."),
        }

        if let Some(specialty) = &self.specialty {
            if self.specialists.is_empty() {
                out.push_str(&format!(
                    "\n\nNenhum especialista encontrado para a especialidade \"{}\".",
                    specialty
                ));
            } else {
                out.push_str("\n\nEspecialistas recomendados:");
                for s in &self.specialists {
                    out.push_str(&format!(
                        "\n- {} ({}) | {} | {} | Tel: {}",
                        s.name, s.specialty, s.department, s.address, s.phone
                    ));
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cardiologist() -> Specialist {
        Specialist {
            name: "Dra. Helena Prado".to_string(),
            specialty: "Cardiologista".to_string(),
            department: "Unidade Central".to_string(),
            address: "Av. Paulista, 1000".to_string(),
            contact: "helena.prado@clinica.example".to_string(),
            phone: "(11) 3333-0001".to_string(),
        }
    }

    #[test]
    fn test_patient_record_csv_headers() {
        let csv = "paciente,anamnese,laudo\n007,Dor no peito,Laudo alterado\n";
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record: PatientRecord = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(record.identifier, "007");
        assert_eq!(record.report, "Laudo alterado");
    }

    #[test]
    fn test_render_semantic_with_specialists() {
        let result = QueryResult::semantic(
            "Procure um cardiologista.".to_string(),
            "cardiologia".to_string(),
            vec![cardiologist()],
        );
        let text = result.render_text();
        assert!(text.starts_with("Procure um cardiologista."));
        assert!(text.contains("Especialistas recomendados:"));
        assert!(text.contains("Dra. Helena Prado"));
        assert!(text.contains("(11) 3333-0001"));
    }

    #[test]
    fn test_render_id_match_without_specialists() {
        let result = QueryResult::id_match(
            "Laudo sem alterações.".to_string(),
            "dermatologia".to_string(),
            Vec::new(),
        );
        let text = result.render_text();
        assert!(text.contains("Resumo do laudo:"));
        assert!(text.contains("Nenhum especialista encontrado"));
        assert!(text.contains("dermatologia"));
    }

    #[test]
    fn test_no_match_mode() {
        let result = QueryResult::no_match();
        assert_eq!(result.mode, QueryMode::NoMatch);
        assert!(result.specialists.is_empty());
        assert_eq!(result.render_text(), "Nenhuma resposta disponível.");
    }
}
