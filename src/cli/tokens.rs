use crate::lexer::tokenize;

/// Lexes a script and returns one line per token, position first.
/// Error tokens are included, so this lists every lexical problem in
/// the script in a single pass.
pub fn execute_tokens(script: &str) -> Vec<String> {
    tokenize(script)
        .iter()
        .map(|token| format!("{} {}", token.position, token))
        .collect()
}
