//! Prompt and response schema for plan generation

use serde_json::{json, Value};
use speedplan_core::{Category, Difficulty, Impact, PlanRequest};

/// Natural-language brief for one site
pub fn build_prompt(request: &PlanRequest) -> String {
    format!(
        "Role: You are a senior WordPress performance engineer who specializes in \
         Elementor sites and Core Web Vitals.\n\
         Task: Write a complete, step-by-step speed optimization plan for a WordPress \
         site built with Elementor.\n\
         \n\
         Site context:\n\
         - URL: {url}\n\
         - Hosting provider: {hosting}\n\
         - Additional context: {notes}\n\
         \n\
         Requirements:\n\
         1. Cover every worthwhile improvement, ordered from easiest to hardest.\n\
         2. Address Elementor specifics such as regenerating CSS and data, \
            experimental features and asset loading.\n\
         3. Name concrete plugins, preferring free ones unless a paid plugin such as \
            WP Rocket is clearly needed.\n\
         4. Include hosting-level work such as PHP version and server caching.\n\
         5. Make each task's instructions detailed enough to follow without \
            further research.\n\
         \n\
         Only recommend plugins that are known to work alongside Elementor.\n",
        url = request.site_url,
        hosting = request.hosting_or_default(),
        notes = request.notes_or_default(),
    )
}

/// Response schema in the service's OpenAPI subset
///
/// `siteUrl` is not part of the schema; the caller supplies it.
pub fn response_schema() -> Value {
    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    let impacts: Vec<&str> = Impact::ALL.iter().map(|i| i.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "estimatedCurrentScore": {
                "type": "NUMBER",
                "description": "Estimated Lighthouse performance score (0-100) typical for an unoptimized site matching this description."
            },
            "summary": {
                "type": "STRING",
                "description": "Strategic summary of the main performance bottlenecks."
            },
            "tasks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "difficulty": {
                            "type": "STRING",
                            "enum": difficulties
                        },
                        "category": {
                            "type": "STRING",
                            "enum": categories
                        },
                        "impact": {
                            "type": "STRING",
                            "enum": impacts
                        },
                        "instructions": {
                            "type": "STRING",
                            "description": "Detailed step-by-step instructions, naming exact plugins and settings."
                        },
                        "tools": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "description": "Plugins or tools needed, e.g. WP Rocket or Autoptimize."
                        }
                    },
                    "required": ["title", "difficulty", "category", "impact", "instructions", "tools"]
                }
            }
        },
        "required": ["estimatedCurrentScore", "summary", "tasks"]
    })
}
