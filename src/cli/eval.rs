use super::CliError;
use crate::{Engine, json};

/// Options for the `eval` command.
pub struct EvalOptions {
    /// The script to evaluate.
    pub script: String,
    /// JSON object bound as the `context`/`c` namespace.
    pub context: Option<String>,
    /// Seed for `math.random` and friends; unseeded when absent.
    pub seed: Option<u64>,
}

/// Evaluates a script and returns the result as JSON.
///
/// Unlike embedded evaluation, parse errors are surfaced here instead of
/// degrading to zero; a CLI user wants the diagnostic.
pub fn execute_eval(options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let engine = match options.seed {
        Some(seed) => Engine::with_seed(seed),
        None => Engine::new(),
    };

    if let Some(context) = &options.context {
        let document: serde_json::Value = serde_json::from_str(context)?;
        let serde_json::Value::Object(map) = document else {
            return Err(CliError::ContextNotAnObject);
        };
        for (name, value) in &map {
            engine.bind_context(name, json::from_json(value))?;
        }
    }

    let statements = Engine::parse(&options.script)?;
    Ok(json::to_json(&engine.eval_parsed(&statements)))
}
