//! Structured tool-call directives embedded in model responses.
//!
//! Chat-completion APIs return tool calls as `(name, json-arguments)` pairs.
//! Only the tools listed here are understood; anything else is dropped while
//! decoding, so callers never dispatch on arbitrary names.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name of the image-synthesis tool announced to the model.
pub const GENERATE_DESIGN_IMAGE: &str = "generate_design_image";

/// A directive the model asked the pipeline to act upon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCallDirective {
    /// Render a design image and attach it to the turn as an artifact.
    GenerateDesignImage {
        prompt: String,
        title: String,
        description: String,
    },
}

#[derive(Deserialize, Default)]
struct GenerateDesignImageArgs {
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

impl ToolCallDirective {
    /// Decodes a raw tool call.
    ///
    /// Unknown tool names yield `None`. For a known tool, malformed or
    /// partial arguments decode to empty fields; the synthesizer fills them
    /// with defaults.
    pub fn from_tool_call(name: &str, arguments: &str) -> Option<Self> {
        match name {
            GENERATE_DESIGN_IMAGE => {
                let args: GenerateDesignImageArgs = serde_json::from_str(arguments)
                    .unwrap_or_else(|err| {
                        tracing::warn!(
                            "[Directive] Malformed {} arguments, using defaults: {}",
                            GENERATE_DESIGN_IMAGE,
                            err
                        );
                        GenerateDesignImageArgs::default()
                    });
                Some(Self::GenerateDesignImage {
                    prompt: args.prompt,
                    title: args.title,
                    description: args.description,
                })
            }
            _ => None,
        }
    }

    /// Tool definitions in the OpenAI `tools` request format.
    pub fn definitions() -> Vec<Value> {
        vec![json!({
            "type": "function",
            "function": {
                "name": GENERATE_DESIGN_IMAGE,
                "description": "Generate a UI/UX design image",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "prompt": {
                            "type": "string",
                            "description": "English description of the image: design type, style, colors"
                        },
                        "title": {
                            "type": "string",
                            "description": "Title of the design"
                        },
                        "description": {
                            "type": "string",
                            "description": "Description of the design"
                        }
                    },
                    "required": ["prompt", "title", "description"]
                }
            }
        })]
    }
}
