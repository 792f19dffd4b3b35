//! Schema Descriptor — the declarative profile shape handed to the model.

use serde_json::{json, Value};

/// Top-level fields the model must always return.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "name",
    "academicHistory",
    "skills",
    "experience",
    "projects",
    "achievements",
];

/// Response schema in the generative-model's OpenAPI subset.
pub fn profile_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "description": "The full name of the person." },
            "academicHistory": {
                "type": "ARRAY",
                "description": "List of all academic qualifications.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "degree": { "type": "STRING", "description": "e.g., Bachelor of Technology in Computer Science" },
                        "institution": { "type": "STRING", "description": "e.g., University of Example" },
                        "cgpa": { "type": "STRING", "description": "e.g., 8.5/10 or 3.8/4.0" },
                        "year": { "type": "STRING", "description": "e.g., 2020-2024" }
                    },
                    "required": ["degree", "institution"]
                }
            },
            "skills": {
                "type": "ARRAY",
                "description": "List of all technical and soft skills.",
                "items": { "type": "STRING" }
            },
            "experience": {
                "type": "ARRAY",
                "description": "List of all work or internship experiences.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": { "type": "STRING" },
                        "role": { "type": "STRING" },
                        "duration": { "type": "STRING", "description": "e.g., June 2023 - August 2023" },
                        "description": { "type": "STRING", "description": "A brief summary of responsibilities and accomplishments." }
                    },
                    "required": ["company", "role", "duration"]
                }
            },
            "projects": {
                "type": "ARRAY",
                "description": "List of personal or academic projects.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "tech": { "type": "STRING", "description": "Comma-separated list of technologies used." },
                        "description": { "type": "STRING" }
                    },
                    "required": ["title", "description"]
                }
            },
            "achievements": {
                "type": "ARRAY",
                "description": "List of awards, hackathon wins, or other achievements.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["title"]
                }
            }
        },
        "required": REQUIRED_FIELDS
    })
}

/// Required fields absent from a model response object.
pub fn missing_fields(value: &Value) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| value.get(f).map_or(true, Value::is_null))
        .collect()
}
