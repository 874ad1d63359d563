//! Template evaluation integration tests.

use glam::DVec3;
use sponge_api::data::value::{Value, ValueKind};
use sponge_api::text::element::{Text, TextColor};
use sponge_api::text::receiver::{BufferedReceiver, MessageReceiver};
use sponge_api::text::template::{
    arg, arg_with, optional_arg, TemplateError, TemplateParams, TextTemplate,
};
use sponge_api::text::template_set::TemplateSet;

fn fixture_templates() -> TemplateSet {
    TemplateSet::load_from_ron(std::path::Path::new("tests/fixtures/templates.ron")).unwrap()
}

#[test]
fn hello_world() {
    let template = TextTemplate::of(["Hello, ".into(), arg("name").into(), "!".into()]);
    let text = template
        .apply(&TemplateParams::new().with("name", Text::of("World")))
        .unwrap();
    assert_eq!(text.to_plain(), "Hello, World!");
}

#[test]
fn missing_argument_message() {
    let template = TextTemplate::of(["Hello, ".into(), arg("name").into()]);
    let err = template.apply(&TemplateParams::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Missing required argument \"name\" in TextTemplate."
    );
}

#[test]
fn mismatched_argument_message() {
    let template = TextTemplate::of([arg_with("coins", |n: i64| Text::of(n.to_string())).into()]);
    let err = template
        .apply(&TemplateParams::new().with("coins", Text::of("lots")))
        .unwrap_err();
    assert!(matches!(
        err,
        TemplateError::MismatchedArgument {
            expected: ValueKind::Int,
            actual: ValueKind::Text,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "Mismatched arguments in TextTemplate. Expected int got text for argument \"coins\"."
    );
}

#[test]
fn custom_transform_and_formatting() {
    let template = TextTemplate::of([
        TextColor::Gold.into(),
        "Position: ".into(),
        arg_with("pos", |v: DVec3| {
            Text::of(format!("{:.0} {:.0} {:.0}", v.x, v.y, v.z))
        })
        .into(),
        optional_arg("suffix").into(),
    ]);
    let text = template
        .apply(&TemplateParams::new().with("pos", DVec3::new(10.4, 64.0, -3.2)))
        .unwrap();
    assert_eq!(text.to_plain(), "Position: 10 64 -3");
    assert_eq!(text.format.color, Some(TextColor::Gold));
}

#[test]
fn fixture_loads() {
    let set = fixture_templates();
    assert_eq!(set.len(), 4);
    for name in ["welcome", "kick", "balance", "teleported"] {
        assert!(set.get(name).is_some(), "Missing template: {}", name);
    }
}

#[test]
fn fixture_welcome_renders() {
    let set = fixture_templates();
    let text = set
        .get("welcome")
        .unwrap()
        .apply(
            &TemplateParams::new()
                .with("server", Text::of("Sponge"))
                .with("player", Text::of("Alex")),
        )
        .unwrap();
    assert_eq!(text.to_plain(), "Welcome to Sponge, Alex!");
}

#[test]
fn fixture_optional_reason() {
    let set = fixture_templates();
    let kick = set.get("kick").unwrap();
    let plain = kick
        .apply(&TemplateParams::new().with("player", Text::of("Sam")))
        .unwrap();
    assert_eq!(plain.to_plain(), "Sam was kicked");

    let with_reason = kick
        .apply(
            &TemplateParams::new()
                .with("player", Text::of("Sam"))
                .with("reason", Text::of(" for spamming")),
        )
        .unwrap();
    assert_eq!(with_reason.to_plain(), "Sam was kicked for spamming");
}

#[test]
fn fixture_typed_arguments() {
    let set = fixture_templates();
    let balance = set.get("balance").unwrap();
    let kinds: Vec<(&str, ValueKind)> = balance
        .arguments()
        .map(|a| (a.name(), a.kind()))
        .collect();
    assert_eq!(kinds, vec![("player", ValueKind::Text), ("coins", ValueKind::Int)]);

    let text = balance
        .apply(
            &TemplateParams::new()
                .with("player", Text::of("Kai"))
                .with("coins", 250),
        )
        .unwrap();
    assert_eq!(text.to_plain(), "Kai has 250 coins");

    let err = balance
        .apply(
            &TemplateParams::new()
                .with("player", Text::of("Kai"))
                .with("coins", 2.5),
        )
        .unwrap_err();
    assert!(matches!(err, TemplateError::MismatchedArgument { .. }));
}

#[test]
fn send_to_many_receivers() {
    let set = fixture_templates();
    let template = set.get("teleported").unwrap();
    let params: TemplateParams = [
        ("x", Value::Float(1.5)),
        ("y", Value::Float(70.0)),
        ("z", Value::Float(-8.25)),
    ]
    .into_iter()
    .collect();

    let mut receivers = vec![BufferedReceiver::default(), BufferedReceiver::default()];
    for receiver in &mut receivers {
        template.send(receiver as &mut dyn MessageReceiver, &params).unwrap();
    }
    for receiver in &receivers {
        assert_eq!(receiver.messages.len(), 1);
        assert_eq!(receiver.messages[0].to_plain(), "Teleported to 1.5, 70, -8.25");
    }
}

#[test]
fn failed_send_delivers_nothing() {
    let set = fixture_templates();
    let mut receiver = BufferedReceiver::default();
    let result = set
        .get("welcome")
        .unwrap()
        .send(&mut receiver, &TemplateParams::new().with("player", Text::of("Alex")));
    assert!(matches!(result, Err(TemplateError::MissingArgument(name)) if name == "server"));
    assert!(receiver.messages.is_empty());
}

#[test]
fn templates_are_shareable_across_threads() {
    let set = fixture_templates();
    let template = set.get("balance").unwrap().clone();
    let handles: Vec<_> = (0..4i64)
        .map(|i| {
            let template = template.clone();
            std::thread::spawn(move || {
                template
                    .apply(
                        &TemplateParams::new()
                            .with("player", Text::of(format!("p{}", i)))
                            .with("coins", i),
                    )
                    .map(|text| text.to_plain())
            })
        })
        .collect();
    let mut outputs: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    outputs.sort();
    assert_eq!(outputs[0], "p0 has 0 coins");
    assert_eq!(outputs[3], "p3 has 3 coins");
}
