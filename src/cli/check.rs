use super::CliError;
use crate::Engine;

/// Parses a script and returns its canonical rendering, one statement
/// per line. The rendering drops redundant parentheses and normalizes
/// identifier case, so it doubles as a formatter.
pub fn execute_check(script: &str) -> Result<String, CliError> {
    let statements = Engine::parse(script)?;
    let mut output = String::new();
    for statement in &statements {
        output.push_str(&format!("{};\n", statement));
    }
    Ok(output)
}
