//! Template Linter: checks template files for argument conflicts.
//!
//! Usage: template_linter <template_dir_or_file>

use rustc_hash::FxHashMap;
use sponge_api::data::value::ValueKind;
use sponge_api::text::template::TextTemplate;
use sponge_api::text::template_set::TemplateSet;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let Some(target) = std::env::args().nth(1).filter(|a| a != "--help" && a != "-h") else {
        println!("Usage: template_linter <template_dir_or_file>");
        return;
    };

    let mut templates = TemplateSet::default();
    let mut errors = Vec::new();
    load_templates(Path::new(&target), &mut templates, &mut errors);
    println!("Loaded {} templates from {}", templates.len(), target);

    let (lint_errors, warnings) = lint_templates(&templates);
    errors.extend(lint_errors);

    print_report(&errors, &warnings);
    process::exit(if errors.is_empty() { 0 } else { 1 });
}

fn print_report(errors: &[String], warnings: &[String]) {
    let lines = warnings
        .iter()
        .map(|w| ("warning", w))
        .chain(errors.iter().map(|e| ("error", e)));
    for (level, message) in lines {
        println!("{:>7}: {}", level, message);
    }
    match (errors.len(), warnings.len()) {
        (0, 0) => println!("templates ok"),
        (e, w) => println!("{} error(s), {} warning(s)", e, w),
    }
}

/// Load a single template file, or every `.ron` file below a directory.
fn load_templates(path: &Path, templates: &mut TemplateSet, errors: &mut Vec<String>) {
    if path.is_dir() {
        load_templates_recursive(path, templates, errors);
    } else if path.is_file() {
        match TemplateSet::load_from_ron(path) {
            Ok(set) => templates.merge(set),
            Err(e) => errors.push(format!("failed to load {}: {}", path.display(), e)),
        }
    } else {
        errors.push(format!("no such file or directory: {}", path.display()));
    }
}

fn load_templates_recursive(dir: &Path, templates: &mut TemplateSet, errors: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        errors.push(format!("cannot read directory {}", dir.display()));
        return;
    };
    let mut paths: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();
    for path in paths {
        if path.is_dir() {
            load_templates_recursive(&path, templates, errors);
        } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            load_templates(&path, templates, errors);
        }
    }
}

/// Returns `(errors, warnings)`.
fn lint_templates(templates: &TemplateSet) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Argument name -> (kind, first template using it), across all templates
    let mut seen_kinds: FxHashMap<&str, (ValueKind, &str)> = FxHashMap::default();

    let mut names: Vec<&String> = templates.templates.keys().collect();
    names.sort();

    for name in names {
        let Some(template) = templates.get(name) else {
            continue;
        };

        if template.elements().is_empty() {
            warnings.push(format!("Template '{}' is empty", name));
        }

        lint_template(name, template, &mut errors, &mut warnings);

        for arg in template.arguments() {
            match seen_kinds.get(arg.name()) {
                Some(&(kind, other)) if kind != arg.kind() => warnings.push(format!(
                    "Argument '{}' is {} in '{}' but {} in '{}'",
                    arg.name(),
                    kind,
                    other,
                    arg.kind(),
                    name
                )),
                Some(_) => {}
                None => {
                    seen_kinds.insert(arg.name(), (arg.kind(), name.as_str()));
                }
            }
        }
    }

    (errors, warnings)
}

fn lint_template(
    name: &str,
    template: &TextTemplate,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let mut args: FxHashMap<&str, (ValueKind, bool)> = FxHashMap::default();
    for arg in template.arguments() {
        match args.get(arg.name()) {
            // One parameter can never satisfy two kinds
            Some(&(kind, _)) if kind != arg.kind() => errors.push(format!(
                "Template '{}' uses argument '{}' as both {} and {}",
                name,
                arg.name(),
                kind,
                arg.kind()
            )),
            Some(&(_, optional)) if optional != arg.is_optional() => warnings.push(format!(
                "Template '{}' marks argument '{}' both optional and required",
                name,
                arg.name()
            )),
            Some(_) => {}
            None => {
                args.insert(arg.name(), (arg.kind(), arg.is_optional()));
            }
        }
    }

    if !args.is_empty() && args.values().all(|&(_, optional)| optional) {
        warnings.push(format!(
            "Template '{}' has only optional arguments and may render without them",
            name
        ));
    }
}
