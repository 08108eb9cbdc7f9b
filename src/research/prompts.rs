//! Prompt templates for the three LLM stages.
//!
//! Every prompt starts with the same expert preamble carrying the user's
//! question, followed by stage-specific instructions.

/// Sample questions offered to users (`GET /examples`, `licita-server examples`).
pub const EXAMPLE_QUESTIONS: [&str; 8] = [
    "Como elaborar um Documento de Formalização de Demanda (DFD)?",
    "Quais são os requisitos para um Estudo Técnico Preliminar (ETP)?",
    "Como estruturar um Termo de Referência (TR) para bens de consumo?",
    "Quais são as modalidades de licitação previstas na Lei 14.133/2021?",
    "Como funciona o processo de contratação integrada?",
    "Quais são os critérios de julgamento permitidos?",
    "Como elaborar especificações técnicas detalhadas?",
    "Quais documentos são obrigatórios no processo licitatório?",
];

fn expert_preamble(user_input: &str) -> String {
    format!(
        r#"
Você é um especialista em licitações públicas, com foco na Lei Federal 14.133/2021 e no Decreto Estadual 1.525/2022 do Estado de Mato Grosso.

Você é especialista em analisar e esclarecer dúvidas sobre:
- Documento de Formalização de Demanda (DFD)
- Estudo Técnico Preliminar (ETP)
- Termo de Referência de Bens de Consumo e Permanente (TR)

Sua resposta DEVE ser técnica, baseada na legislação vigente e em informações atualizadas.
Cite artigos, parágrafos e incisos específicos da legislação.

Aqui está a pergunta do usuário:
<PERGUNTA_USUARIO>
{user_input}
</PERGUNTA_USUARIO>
"#
    )
}

/// Ask for a list of search queries (answered as a `QueryList`).
pub fn build_queries(user_input: &str) -> String {
    format!(
        r#"{}
Seu primeiro objetivo é construir uma lista de consultas específicas
que serão usadas para encontrar respostas sobre a pergunta do usuário relacionada a licitações.

As consultas devem focar em:
- Lei Federal 14.133/2021
- Decreto Estadual 1.525/2022
- Documento de Formalização de Demanda (DFD)
- Estudo Técnico Preliminar (ETP)
- Termo de Referência (TR)

Responda com entre 3-5 consultas específicas.
"#,
        expert_preamble(user_input)
    )
}

/// Summarize one extracted page for one query.
pub fn resume_search(query: &str, search_results: &str) -> String {
    format!(
        r#"{}
Seu objetivo aqui é analisar os resultados da busca web e fazer uma síntese,
enfatizando apenas o que é relevante para a pergunta do usuário sobre licitações.

Após seu trabalho, outro agente usará a síntese para construir uma resposta final ao usuário, então
certifique-se de que a síntese contenha apenas informações úteis sobre:
- Lei Federal 14.133/2021
- Decreto Estadual 1.525/2022
- DFD, ETP ou TR conforme a pergunta

Seja conciso e claro, citando artigos específicos quando possível.

Aqui estão os resultados da busca web:
<RESULTADOS_BUSCA>
{search_results}
</RESULTADOS_BUSCA>
"#,
        expert_preamble(query)
    )
}

/// Final cited answer built from the evidence block.
pub fn build_final_response(user_input: &str, search_results: &str) -> String {
    format!(
        r#"{}
Seu objetivo aqui é desenvolver uma resposta final ao usuário usando
os relatórios feitos durante a busca web, com suas sínteses.

A resposta deve conter entre 500 - 800 palavras e deve ser técnica e precisa.

Aqui estão os resultados da busca web:
<RESULTADOS_BUSCA>
{search_results}
</RESULTADOS_BUSCA>

Você DEVE adicionar citações de referência (com o número da citação, exemplo: [1]) para os
artigos e documentos que você usou em cada parágrafo de sua resposta.

Sempre cite:
- Artigos específicos da Lei 14.133/2021
- Artigos do Decreto 1.525/2022
- Parágrafos e incisos quando aplicável
- URLs das fontes oficiais
"#,
        expert_preamble(user_input)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_queries_embeds_question() {
        let prompt = build_queries("Como elaborar um DFD?");
        assert!(prompt.contains("<PERGUNTA_USUARIO>\nComo elaborar um DFD?\n</PERGUNTA_USUARIO>"));
        assert!(prompt.contains("entre 3-5 consultas"));
    }

    #[test]
    fn test_resume_search_embeds_content() {
        let prompt = resume_search("ETP requisitos", "Art. 18 da Lei 14.133");
        assert!(prompt.contains("ETP requisitos"));
        assert!(prompt.contains("<RESULTADOS_BUSCA>\nArt. 18 da Lei 14.133\n</RESULTADOS_BUSCA>"));
    }

    #[test]
    fn test_final_response_asks_for_citations() {
        let prompt = build_final_response("pergunta", "[1]\n\nTitle: x\n");
        assert!(prompt.contains("pergunta"));
        assert!(prompt.contains("[1]\n\nTitle: x"));
        assert!(prompt.contains("exemplo: [1]"));
    }
}
