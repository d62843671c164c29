//! Wizard meme generation runs.
//!
//! Drives the two Porchroot generator scripts: picks which prompts or quotes
//! to use, calls the script's generation function once per item, and
//! aggregates the results into a [`GenerationReport`].

use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::clamp::clamp_requested;
use crate::error::CoreError;
use crate::scripting::executor::{is_truthy, path_arg, ScriptModule};

/// Script that defines wizard background prompts.
pub const MEMES_SCRIPT: &str = "generate_wizard_memes";

/// Script that renders quotes onto wizard scenes.
pub const QUOTES_SCRIPT: &str = "generate_wizard_quote_images";

/// Quotes generated when the caller does not ask for a specific count.
pub const DEFAULT_QUOTE_COUNT: i64 = 5;

/// Scene used when the quote script defines no `SCENE_TEMPLATES`.
pub const FALLBACK_SCENE: &str = "Wizard scene";

/// Outcome of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Number of items attempted after clamping.
    pub requested: usize,
    /// Number of items the script reported as generated.
    pub generated: usize,
    pub output_dir: String,
    /// Output paths of the successful items only.
    pub files: Vec<String>,
}

pub fn background_file_name(index: usize) -> String {
    format!("wizard_bg_{index:02}.png")
}

pub fn quote_file_name(quote_id: i64) -> String {
    format!("wizard_quote_{quote_id:03}.png")
}

/// Generate wizard backgrounds from the first `requested` prompts.
///
/// With no explicit count every prompt is used.
pub async fn generate_backgrounds(
    module: &dyn ScriptModule,
    requested: Option<i64>,
) -> Result<GenerationReport, CoreError> {
    let prompts = module
        .attr("PROMPTS")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if prompts.is_empty() {
        return Err(CoreError::NoItemsAvailable(format!(
            "{MEMES_SCRIPT}.py has no PROMPTS defined."
        )));
    }

    let total = prompts.len();
    let count = clamp_requested(requested, total, total as i64);
    if count == 0 {
        return Err(CoreError::ZeroRequested(
            "Requested zero prompts; nothing to generate.".to_string(),
        ));
    }

    let output_dir = output_dir(module)?;
    let mut files = Vec::new();
    for (idx, prompt) in prompts.into_iter().take(count).enumerate() {
        let index = idx + 1;
        let output_path = output_dir.join(background_file_name(index));
        let result = module
            .call(
                "generate_wizard_background",
                vec![prompt, path_arg(&output_path), Value::from(index)],
            )
            .await
            .map_err(|e| CoreError::UpstreamGeneration(e.to_string()))?;
        if is_truthy(&result) {
            files.push(output_path.display().to_string());
        } else {
            tracing::warn!(index, "Background generation reported failure");
        }
    }

    Ok(report(count, &output_dir, files))
}

/// Generate quote memes for a random sample of the script's quotes.
///
/// With no explicit count, up to [`DEFAULT_QUOTE_COUNT`] quotes are used.
pub async fn generate_quotes<R>(
    module: &dyn ScriptModule,
    requested: Option<i64>,
    rng: &mut R,
) -> Result<GenerationReport, CoreError>
where
    R: Rng + Send,
{
    let quotes = match module.call("load_quotes", Vec::new()).await {
        Ok(Value::Array(quotes)) => quotes,
        Ok(Value::Null) => Vec::new(),
        Ok(other) => {
            return Err(CoreError::UpstreamGeneration(format!(
                "Failed to load quotes: expected a list, got {other}"
            )))
        }
        Err(e) => {
            return Err(CoreError::UpstreamGeneration(format!(
                "Failed to load quotes: {e}"
            )))
        }
    };
    if quotes.is_empty() {
        return Err(CoreError::NoItemsAvailable(
            "No quotes available to use.".to_string(),
        ));
    }

    let total = quotes.len();
    let requested = requested.unwrap_or_else(|| DEFAULT_QUOTE_COUNT.min(total as i64));
    // The defaulted value doubles as the fallback, so this only bounds it.
    let count = clamp_requested(Some(requested), total, requested);
    if count == 0 {
        return Err(CoreError::ZeroRequested("Requested zero quotes.".to_string()));
    }

    let scenes = scene_templates(module)?;
    let selected: Vec<Value> = quotes.choose_multiple(rng, count).cloned().collect();

    let output_dir = output_dir(module)?;
    let mut files = Vec::new();
    for (idx, quote) in selected.into_iter().enumerate() {
        let index = idx + 1;
        let scene = scenes.choose(rng).cloned().unwrap_or(Value::Null);
        let result = module
            .call(
                "generate_wizard_quote",
                vec![quote.clone(), scene, Value::from(index)],
            )
            .await
            .map_err(|e| CoreError::UpstreamGeneration(e.to_string()))?;
        if !is_truthy(&result) {
            tracing::warn!(index, "Quote generation reported failure");
            continue;
        }
        let quote_id = quote["id"].as_i64().ok_or_else(|| {
            CoreError::UpstreamGeneration(format!("Quote has no integer id: {quote}"))
        })?;
        files.push(
            output_dir
                .join(quote_file_name(quote_id))
                .display()
                .to_string(),
        );
    }

    Ok(report(count, &output_dir, files))
}

fn output_dir(module: &dyn ScriptModule) -> Result<PathBuf, CoreError> {
    module
        .attr("OUTPUT_DIR")
        .and_then(Value::as_str)
        .map(PathBuf::from)
        .ok_or_else(|| {
            CoreError::UpstreamGeneration(format!(
                "{} has no OUTPUT_DIR defined.",
                module.path().display()
            ))
        })
}

/// Scene templates to pick from. Only an absent attribute falls back to
/// [`FALLBACK_SCENE`]; an empty list cannot be chosen from.
fn scene_templates(module: &dyn ScriptModule) -> Result<Vec<Value>, CoreError> {
    match module.attr("SCENE_TEMPLATES") {
        None => Ok(vec![Value::from(FALLBACK_SCENE)]),
        Some(Value::Array(scenes)) if scenes.is_empty() => Err(CoreError::UpstreamGeneration(
            "IndexError: Cannot choose from an empty sequence (SCENE_TEMPLATES is empty)"
                .to_string(),
        )),
        Some(Value::Array(scenes)) => Ok(scenes.clone()),
        Some(other) => Err(CoreError::UpstreamGeneration(format!(
            "SCENE_TEMPLATES must be a list, got {other}"
        ))),
    }
}

fn report(count: usize, output_dir: &Path, files: Vec<String>) -> GenerationReport {
    GenerationReport {
        requested: count,
        generated: files.len(),
        output_dir: output_dir.display().to_string(),
        files,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
