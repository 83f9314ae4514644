//! Prompt builder for documentation answers.

/// Build the single user prompt: question plus the retrieved documentation,
/// both embedded verbatim.
///
/// # Example
/// ```
/// # use doc_qa::prompt::build_answer_prompt;
/// let p = build_answer_prompt("What is X?", "X is a thing.");
/// assert!(p.starts_with("Answer this question based on the documentation:"));
/// assert!(p.contains("Question: What is X?"));
/// ```
pub fn build_answer_prompt(question: &str, documentation: &str) -> String {
    format!(
        "Answer this question based on the documentation:\n\n\
         Question: {question}\n\n\
         Documentation:\n\
         {documentation}\n\n\
         Provide a clear, helpful answer."
    )
}
