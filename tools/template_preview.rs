//! Preview: renders a named template from the command line.
//!
//! Usage: template_preview --templates <path> <name> [key=value ...]
//!
//! Values are converted to the kind the template declares for the
//! argument: `text`/`string` as-is, `int`, `float`, `bool`, and `vector`
//! as `x,y,z`. Unknown arguments are passed as text.

use glam::DVec3;
use sponge_api::data::value::{Value, ValueKind};
use sponge_api::registry::GameRegistry;
use sponge_api::text::element::Text;
use sponge_api::text::template::{TemplateParams, TextTemplate};
use sponge_api::text::template_set::TemplateSet;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut templates_path = None;
    let mut name = None;
    let mut raw_params = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--templates" if i + 1 < args.len() => {
                i += 1;
                templates_path = Some(args[i].clone());
            }
            arg if arg.contains('=') => raw_params.push(arg.to_string()),
            arg if name.is_none() => name = Some(arg.to_string()),
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let (Some(templates_path), Some(name)) = (templates_path, name) else {
        print_usage();
        process::exit(1);
    };

    let registry = match load_registry(&templates_path) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let template = match registry.template(&name) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let params = match build_params(template, &raw_params) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    match registry.render(&name, &params) {
        Ok(text) => println!("{}", text.to_plain()),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Usage: template_preview --templates <path> <name> [key=value ...]");
}

fn load_registry(path: &str) -> Result<GameRegistry, Box<dyn std::error::Error>> {
    let builder = GameRegistry::builder();
    let registry = if Path::new(path).is_file() {
        builder
            .with_templates(TemplateSet::load_from_ron(Path::new(path))?)
            .build()?
    } else {
        builder.templates_dir(path).build()?
    };
    Ok(registry)
}

fn build_params(template: &TextTemplate, raw: &[String]) -> Result<TemplateParams, String> {
    let mut params = TemplateParams::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let kind = template
            .arguments()
            .find(|arg| arg.name() == key)
            .map(|arg| arg.kind())
            .unwrap_or(ValueKind::Text);
        params.insert(key, parse_value(kind, value)?);
    }
    Ok(params)
}

fn parse_value(kind: ValueKind, raw: &str) -> Result<Value, String> {
    let invalid = || format!("'{}' is not a valid {}", raw, kind);
    Ok(match kind {
        ValueKind::Text => Value::Text(Text::of(raw)),
        ValueKind::String => Value::String(raw.to_string()),
        ValueKind::Int => Value::Int(raw.parse().map_err(|_| invalid())?),
        ValueKind::Float => Value::Float(raw.parse().map_err(|_| invalid())?),
        ValueKind::Bool => Value::Bool(raw.parse().map_err(|_| invalid())?),
        ValueKind::Vector => {
            let parts: Vec<f64> = raw
                .split(',')
                .map(|part| part.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?;
            match parts.as_slice() {
                [x, y, z] => Value::Vector(DVec3::new(*x, *y, *z)),
                _ => return Err(invalid()),
            }
        }
    })
}
