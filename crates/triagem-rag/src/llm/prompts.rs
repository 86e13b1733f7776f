//! Prompt text for the clinic assistant.
//!
//! Prompts are in Portuguese, matching the corpus and the patient-facing
//! product. Each builder keeps the instruction and the injected text
//! clearly separated so the model cannot confuse one for the other.

/// Assistant persona shared by every operation.
pub const SYSTEM_PERSONA: &str = "Você é uma assistente virtual de uma clínica médica. \
Seu papel é orientar os pacientes, com base na conclusão de seus exames, \
sobre qual profissional procurar a partir da base de dados disponível.";

/// Summarization: a few sentences, next steps for the patient.
pub fn summarize_prompt(report: &str) -> String {
    format!(
        "{}\n\nResuma o laudo médico a seguir em no máximo três frases, \
         destacando os próximos passos recomendados ao paciente.\n\nLaudo:\n{}",
        SYSTEM_PERSONA, report
    )
}

/// Specialty classification: the model must answer with a name only.
/// The output is still free text and goes through cleanup before matching.
pub fn classify_prompt(text: &str) -> String {
    format!(
        "{}\n\nCom base no texto clínico a seguir, responda APENAS com o nome \
         da especialidade médica indicada, sem justificativa e sem pontuação.\n\nTexto:\n{}",
        SYSTEM_PERSONA, text
    )
}

/// Open answer grounded in retrieved context. An empty context is allowed;
/// the model then answers from the persona instruction alone.
pub fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "{}\n\nContexto:\n{}\n\nPergunta: {}",
        SYSTEM_PERSONA, context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_prompt_contains_report() {
        let prompt = summarize_prompt("Eletrocardiograma alterado");
        assert!(prompt.contains("Eletrocardiograma alterado"));
        assert!(prompt.contains("três frases"));
    }

    #[test]
    fn test_classify_prompt_demands_name_only() {
        let prompt = classify_prompt("dor no peito ao subir escadas");
        assert!(prompt.contains("APENAS"));
        assert!(prompt.contains("dor no peito ao subir escadas"));
    }

    #[test]
    fn test_answer_prompt_keeps_context_and_question_separate() {
        let prompt = answer_prompt("passagem recuperada", "estou com dor no peito");
        let context_pos = prompt.find("passagem recuperada").unwrap();
        let question_pos = prompt.find("estou com dor no peito").unwrap();
        assert!(context_pos < question_pos);
    }

    #[test]
    fn test_answer_prompt_accepts_empty_context() {
        let prompt = answer_prompt("", "pergunta");
        assert!(prompt.contains("Pergunta: pergunta"));
    }
}
