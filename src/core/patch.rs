//! Best-effort repair of generated output.
//!
//! A fixed, ordered list of named rules, each a pure function over the file
//! map. Rules only add or overwrite entries; the step as a whole never
//! fails, and applying it twice yields the same map as applying it once
//! (every rule is overwrite-based or guarded, never accumulating).

use regex::Regex;

use crate::core::FileMap;
use crate::core::scaffold;

pub struct PatchRule {
    pub name: &'static str,
    run: fn(&mut FileMap),
}

impl PatchRule {
    pub fn apply(&self, files: &mut FileMap) {
        (self.run)(files);
    }
}

pub const RULES: &[PatchRule] = &[
    PatchRule {
        name: "ensure-required-files",
        run: ensure_required_files,
    },
    PatchRule {
        name: "canonicalize-configs",
        run: canonicalize_configs,
    },
    PatchRule {
        name: "rebuild-routes",
        run: rebuild_routes,
    },
    PatchRule {
        name: "normalize-component-imports",
        run: normalize_component_imports,
    },
    PatchRule {
        name: "ensure-service-decorators",
        run: ensure_service_decorators,
    },
];

/// Apply every rule in order.
pub fn apply_all(files: &mut FileMap) {
    for rule in RULES {
        rule.apply(files);
        tracing::debug!("applied patch rule {}", rule.name);
    }
}

/// Insert the default content for any required file the generator omitted.
fn ensure_required_files(files: &mut FileMap) {
    for (path, content) in scaffold::defaults() {
        files
            .entry((*path).to_string())
            .or_insert_with(|| (*content).to_string());
    }
}

/// Overwrite known trouble spots with their canonical known-good form.
fn canonicalize_configs(files: &mut FileMap) {
    for (path, content) in scaffold::canonical() {
        files.insert((*path).to_string(), (*content).to_string());
    }
}

/// Regenerate `src/app/app.routes.ts` from the component files actually
/// present, so every route's import resolves to a generated path.
fn rebuild_routes(files: &mut FileMap) {
    let mut imports = Vec::new();
    let mut routes = Vec::new();

    for path in files.keys() {
        let Some(base) = component_base(path) else {
            continue;
        };
        let class_name = format!("{}Component", pascal_case(&base));
        let dir = &path[..path.len() - format!("{base}.component.ts").len()];
        let rel_dir = dir.trim_start_matches("src/app/").trim_end_matches('/');
        let import_path = if rel_dir.is_empty() {
            format!("./{base}.component")
        } else {
            format!("./{rel_dir}/{base}.component")
        };
        let route_path = base.to_lowercase().replace("-page", "");
        imports.push(format!("import {{ {class_name} }} from '{import_path}';"));
        routes.push(format!(
            "{{ path: '{route_path}', component: {class_name} }}"
        ));
    }

    let mut body = String::from("import { Routes } from '@angular/router';\n");
    body.push_str(&imports.join("\n"));
    body.push_str("\n\nexport const routes: Routes = [\n");
    for route in &routes {
        body.push_str("  ");
        body.push_str(route);
        body.push_str(",\n");
    }
    body.push_str("  { path: '**', redirectTo: '' }\n];");
    files.insert("src/app/app.routes.ts".to_string(), body);
}

/// Deduplicate import lines in each component file, prepend the imports its
/// content requires, and extend the `@Component` imports array to match.
/// Directive usage is detected across the component file and its sibling
/// template, since `ngModel`/`routerLink` usually live in the `.html`.
fn normalize_component_imports(files: &mut FileMap) {
    let paths: Vec<String> = files
        .keys()
        .filter(|p| component_base(p).is_some())
        .cloned()
        .collect();

    for path in paths {
        let content = files[&path].clone();
        let template = files
            .get(&path.replace(".component.ts", ".component.html"))
            .cloned()
            .unwrap_or_default();
        let haystack = format!("{content}\n{template}");

        let mut required_lines = vec![
            "import { Component } from '@angular/core';".to_string(),
            "import { CommonModule } from '@angular/common';".to_string(),
        ];
        let mut required_modules = vec!["CommonModule".to_string()];
        if haystack.contains("ngModel") || haystack.contains("formGroup") {
            required_lines.push(
                "import { FormsModule, ReactiveFormsModule } from '@angular/forms';".to_string(),
            );
            required_modules.push("FormsModule".to_string());
            required_modules.push("ReactiveFormsModule".to_string());
        }
        if haystack.contains("routerLink") || haystack.contains("router-outlet") {
            required_lines.push("import { RouterModule } from '@angular/router';".to_string());
            required_modules.push("RouterModule".to_string());
        }
        if haystack.contains("HttpClient") {
            required_lines
                .push("import { HttpClientModule } from '@angular/common/http';".to_string());
            required_modules.push("HttpClientModule".to_string());
        }

        let mut import_lines = Vec::new();
        let mut other_lines = Vec::new();
        for line in content.lines() {
            if line.trim_start().starts_with("import ") {
                import_lines.push(line.trim().to_string());
            } else {
                other_lines.push(line.to_string());
            }
        }

        let mut merged = Vec::new();
        for line in required_lines.into_iter().chain(import_lines) {
            if !merged.contains(&line) {
                merged.push(line);
            }
        }

        let rest = other_lines.join("\n");
        let rest = extend_imports_array(rest.trim_start_matches('\n'), &required_modules);
        files.insert(path, format!("{}\n\n{}", merged.join("\n"), rest));
    }
}

/// Union `required` into the first `imports: [ ... ]` array, if one exists.
fn extend_imports_array(content: &str, required: &[String]) -> String {
    let re = Regex::new(r"imports:\s*\[([^\]]*)\]").unwrap();
    let Some(caps) = re.captures(content) else {
        return content.to_string();
    };
    let whole = caps.get(0).unwrap();
    let existing = caps.get(1).unwrap().as_str();

    let mut modules: Vec<String> = existing
        .split(',')
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    for module in required {
        if !modules.contains(module) {
            modules.push(module.clone());
        }
    }

    let replacement = format!("imports: [{}]", modules.join(", "));
    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..whole.start()]);
    out.push_str(&replacement);
    out.push_str(&content[whole.end()..]);
    out
}

/// Prepend an `@Injectable` header to service files that lack one.
fn ensure_service_decorators(files: &mut FileMap) {
    let paths: Vec<String> = files
        .keys()
        .filter(|p| p.ends_with(".service.ts"))
        .cloned()
        .collect();
    for path in paths {
        let content = &files[&path];
        if content.contains("@Injectable") {
            continue;
        }
        let patched = format!(
            "import {{ Injectable }} from '@angular/core';\nimport {{ HttpClient }} from '@angular/common/http';\nimport {{ Observable }} from 'rxjs';\n\n@Injectable({{\n  providedIn: 'root'\n}})\n{content}"
        );
        files.insert(path, patched);
    }
}

/// `src/app/**/foo-bar.component.ts` → `foo-bar`, excluding the root
/// `app.component.ts` shell.
fn component_base(path: &str) -> Option<String> {
    if !path.starts_with("src/app/") || path == "src/app/app.component.ts" {
        return None;
    }
    let file = path.rsplit('/').next()?;
    let base = file.strip_suffix(".component.ts")?;
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

fn pascal_case(kebab: &str) -> String {
    kebab
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
