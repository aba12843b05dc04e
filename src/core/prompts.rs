//! Prompt assembly. Write-once strings: a fixed instructional template plus
//! the data interpolation (design description or structure) and any
//! accumulated guidance from the feedback store.

/// Ask the model for a design structure (components/services/models/routes)
/// derived from a free-text description. The response contract is JSON only.
pub fn design_from_text(description: &str, guidance: &str) -> String {
    format!(
        r#"You are an expert Angular developer. Generate a complete Angular application based on this design description:

{description}
{guidance_section}
IMPORTANT: First, generate ONLY a design structure in JSON format that describes the components, services, and models needed for this application. The structure must include:

1. Components (with their hierarchy and relationships)
2. Services (with their responsibilities)
3. Models (with their properties and types)
4. Routes (with their paths and components)

Use this shape:
{{
  "components": {{
    "header": {{
      "description": "Main navigation header",
      "properties": ["title", "navItems"],
      "childComponents": []
    }}
  }},
  "services": {{
    "data": {{
      "description": "Handles data operations",
      "methods": ["getData", "saveData"]
    }}
  }},
  "models": {{
    "user": {{
      "properties": {{ "id": "string", "name": "string" }}
    }}
  }},
  "routes": [
    {{ "path": "", "component": "HomepageComponent" }}
  ]
}}

IMPORTANT: Return ONLY the JSON structure, no additional code or explanations."#,
        guidance_section = guidance_section(guidance),
    )
}

/// Ask the model for the full source tree implementing a design structure.
/// The response contract is the repeating file-block convention the
/// extractor scans for.
pub fn code_from_design(design_json: &str, guidance: &str) -> String {
    format!(
        r#"You are an expert Angular developer. Generate a complete Angular application based on this design structure:

{design_json}
{guidance_section}
CRITICAL REQUIREMENTS:

1. Emit every file using exactly this format, one block per file:

filepath: <relative path>
---
<complete file content>
---

2. Generate standalone components (Angular 17), one directory per component containing the .component.ts, .component.html, and .component.css files.

3. Include ALL of these files: tsconfig.json, tsconfig.app.json, tsconfig.spec.json, angular.json, package.json, src/main.ts, src/index.html, src/styles.css, src/polyfills.ts, src/app/app.config.ts, src/app/app.component.ts, src/app/app.component.html, src/app/app.component.css, src/app/app.routes.ts.

4. Every component referenced by a route must exist as a generated file.

5. Return ONLY file blocks, no explanations outside them."#,
        guidance_section = guidance_section(guidance),
    )
}

fn guidance_section(guidance: &str) -> String {
    if guidance.trim().is_empty() {
        String::new()
    } else {
        format!("\nApply these accumulated guidelines from previous runs:\n{guidance}\n")
    }
}
