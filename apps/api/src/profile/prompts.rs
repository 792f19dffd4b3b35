// Resume extraction prompt and its single few-shot example.

use serde_json::{json, Value};

pub const EXTRACTION_INSTRUCTION: &str = "\
Analyze the provided resume. Extract the user's profile information and structure it \
according to the provided JSON schema. It is critical that you return all fields defined \
in the schema. If a section like 'achievements' or 'projects' is not present in the resume, \
you MUST return an empty array [] for that field. Do not omit any fields.";

pub const FEW_SHOT_INPUT: &str = "\
Example Input Resume Text: Jane Doe - Software Engineer. Education: B.S. in CS at \
Tech University (2022). Skills: JavaScript, React.";

/// The model turn paired with `FEW_SHOT_INPUT`: absent sections are empty lists.
pub fn few_shot_output() -> Value {
    json!({
        "name": "Jane Doe",
        "academicHistory": [
            { "degree": "B.S. in CS", "institution": "Tech University", "cgpa": null, "year": "2022" }
        ],
        "skills": ["JavaScript", "React"],
        "experience": [],
        "projects": [],
        "achievements": []
    })
}
