/// Seq2seq input for a question answered against retrieved context.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!("Question: {question}\nContext: {context}\nAnswer:")
}
