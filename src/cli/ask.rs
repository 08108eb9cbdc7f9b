//! Console analysis
//!
//! Runs the pipeline from the terminal, printing stage progress as it happens
//! and the thinking process, analysis and references when the run finishes.

use super::output::Output;
use crate::{
    research::coordinator::AnalysisPipeline,
    types::{AnalysisResponse, AppError, Result},
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

/// Shown after every console analysis
pub const LEGISLATION_TIP: &str = "Dica: Esta análise é baseada na Lei Federal 14.133/2021 e no \
     Decreto Estadual 1.525/2022. Para questões específicas, consulte sempre a legislação oficial.";

/// Words that end the interactive session
const EXIT_WORDS: [&str; 3] = ["sair", "exit", "quit"];

/// Answer one question, or loop over stdin when `question` is `None`
pub async fn run(
    pipeline: &AnalysisPipeline,
    question: Option<String>,
    show_thinking: bool,
    output: &Output,
) -> Result<()> {
    if let Some(question) = question {
        return ask_once(pipeline, &question, show_thinking, output).await;
    }

    output.banner();
    output.info("Digite sua dúvida sobre licitações (linha vazia ou 'sair' para encerrar).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        output.prompt("Qual sua dúvida sobre licitações?");

        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read stdin: {}", e)))?
        else {
            break;
        };
        let line = line.trim();
        if line.is_empty() || EXIT_WORDS.contains(&line.to_lowercase().as_str()) {
            break;
        }

        // A failed question should not end the session
        if let Err(e) = ask_once(pipeline, line, show_thinking, output).await {
            output.error(&format!("Erro na análise: {}", e));
        }
    }

    Ok(())
}

async fn ask_once(
    pipeline: &AnalysisPipeline,
    question: &str,
    show_thinking: bool,
    output: &Output,
) -> Result<()> {
    output.header("Analisando legislação de licitações...");

    let (tx, mut rx) = mpsc::unbounded_channel();

    let analysis = async move {
        let tx = tx;
        pipeline.analyze_with_progress(question, Some(&tx)).await
    };
    let progress = async {
        while let Some(step) = rx.recv().await {
            output.info(&step.message);
        }
    };

    let (response, ()) = tokio::join!(analysis, progress);
    print_response(&response?, show_thinking, output);

    Ok(())
}

/// Render a finished analysis to the terminal
pub fn print_response(response: &AnalysisResponse, show_thinking: bool, output: &Output) {
    if show_thinking && !response.thinking_process.is_empty() {
        output.subheader("🧠 Processo de Análise");
        output.dimmed_block(&response.thinking_process);
    }

    output.subheader("📋 Análise Técnica");
    output.block(&response.analysis);

    if !response.references.is_empty() {
        output.subheader("References");
        for line in response.references.lines().filter(|l| !l.trim().is_empty()) {
            output.list_item(line);
        }
    }

    output.hint(LEGISLATION_TIP);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(thinking: &str, references: &str) -> AnalysisResponse {
        AnalysisResponse {
            question: "O que é ETP?".to_string(),
            analysis: "O ETP é o Estudo Técnico Preliminar [1].".to_string(),
            references: references.to_string(),
            thinking_process: thinking.to_string(),
            timestamp: crate::types::timestamp(),
            status: "completed".to_string(),
        }
    }

    #[test]
    fn test_print_response_no_panic() {
        let output = Output::no_color();
        print_response(&response("plano", "[1] - [ETP](https://www.gov.br/etp)"), true, &output);
        print_response(&response("", ""), false, &output);
    }

    #[test]
    fn test_exit_words_lowercase() {
        assert!(EXIT_WORDS.iter().all(|w| *w == w.to_lowercase()));
    }
}
