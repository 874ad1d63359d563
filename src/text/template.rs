//! Reusable text templates: named, typed placeholders resolved at evaluation time.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::element::{Text, TextBuilder, TextColor, TextElement, TextStyle};
use super::receiver::MessageReceiver;
use crate::data::value::{FromValue, Value, ValueKind};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Missing required argument \"{0}\" in TextTemplate.")]
    MissingArgument(String),
    #[error(
        "Mismatched arguments in TextTemplate. Expected {expected} got {actual} for argument \"{name}\"."
    )]
    MismatchedArgument {
        expected: ValueKind,
        actual: ValueKind,
        name: String,
    },
    #[error("template parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

type Transform = dyn Fn(&Value) -> Option<Text> + Send + Sync;

/// A named placeholder within a [`TextTemplate`].
///
/// The placeholder is bound to a single [`ValueKind`]; its transform turns a
/// value of that kind into [`Text`].
#[derive(Clone)]
pub struct Arg {
    name: String,
    kind: ValueKind,
    transform: Arc<Transform>,
    optional: bool,
}

impl Arg {
    /// A typed argument. `f` receives the parameter converted to `T`.
    pub fn new<T, F>(name: impl Into<String>, f: F) -> Arg
    where
        T: FromValue + 'static,
        F: Fn(T) -> Text + Send + Sync + 'static,
    {
        Arg {
            name: name.into(),
            kind: T::KIND,
            transform: Arc::new(move |value: &Value| T::from_value(value).map(&f)),
            optional: false,
        }
    }

    /// An argument of `kind` that renders the value with its `Display` impl.
    pub fn displayed(name: impl Into<String>, kind: ValueKind) -> Arg {
        let transform: Arc<Transform> = match kind {
            ValueKind::Text => Arc::new(|value: &Value| Text::from_value(value)),
            _ => Arc::new(move |value: &Value| {
                (value.kind() == kind).then(|| Text::of(value.to_string()))
            }),
        };
        Arg {
            name: name.into(),
            kind,
            transform,
            optional: false,
        }
    }

    /// Allow this argument to be omitted from the parameters.
    pub fn optional(mut self) -> Arg {
        self.optional = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    fn check(&self, value: &Value) -> Result<(), TemplateError> {
        if value.kind() != self.kind {
            return Err(TemplateError::MismatchedArgument {
                expected: self.kind,
                actual: value.kind(),
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Evaluate the argument for a supplied parameter.
    fn eval(&self, value: &Value) -> Result<Text, TemplateError> {
        self.check(value)?;
        (self.transform)(value).ok_or_else(|| TemplateError::MismatchedArgument {
            expected: self.kind,
            actual: value.kind(),
            name: self.name.clone(),
        })
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// Required argument expecting a [`Text`] parameter, appended unchanged.
pub fn arg(name: impl Into<String>) -> Arg {
    Arg::new(name, |text: Text| text)
}

/// Optional argument expecting a [`Text`] parameter.
pub fn optional_arg(name: impl Into<String>) -> Arg {
    arg(name).optional()
}

/// Required argument of type `T`, rendered through `f`.
pub fn arg_with<T, F>(name: impl Into<String>, f: F) -> Arg
where
    T: FromValue + 'static,
    F: Fn(T) -> Text + Send + Sync + 'static,
{
    Arg::new(name, f)
}

/// One entry of a [`TextTemplate`].
#[derive(Debug, Clone)]
pub enum TemplateElement {
    /// A pre-built element, appended via [`TextElement::append_to`].
    Element(Arc<dyn TextElement>),
    /// A placeholder filled from the parameters.
    Arg(Arg),
    /// Any other value, already in its textual form.
    Literal(String),
}

impl From<Arg> for TemplateElement {
    fn from(arg: Arg) -> Self {
        TemplateElement::Arg(arg)
    }
}

impl From<Text> for TemplateElement {
    fn from(text: Text) -> Self {
        TemplateElement::Element(Arc::new(text))
    }
}

impl From<TextColor> for TemplateElement {
    fn from(color: TextColor) -> Self {
        TemplateElement::Element(Arc::new(color))
    }
}

impl From<TextStyle> for TemplateElement {
    fn from(style: TextStyle) -> Self {
        TemplateElement::Element(Arc::new(style))
    }
}

impl From<&str> for TemplateElement {
    fn from(s: &str) -> Self {
        TemplateElement::Literal(s.to_string())
    }
}

impl From<String> for TemplateElement {
    fn from(s: String) -> Self {
        TemplateElement::Literal(s)
    }
}

impl From<char> for TemplateElement {
    fn from(c: char) -> Self {
        TemplateElement::Literal(c.to_string())
    }
}

impl From<i64> for TemplateElement {
    fn from(n: i64) -> Self {
        TemplateElement::Literal(n.to_string())
    }
}

impl From<f64> for TemplateElement {
    fn from(x: f64) -> Self {
        TemplateElement::Literal(x.to_string())
    }
}

impl From<bool> for TemplateElement {
    fn from(b: bool) -> Self {
        TemplateElement::Literal(b.to_string())
    }
}

/// Named parameter values supplied to [`TextTemplate::eval`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateParams {
    values: FxHashMap<String, Value>,
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TemplateParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = TemplateParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// A reusable template producing a formatted [`TextBuilder`].
///
/// Elements are appended to the result in the order given to
/// [`TextTemplate::of`]. The template never changes after construction, so
/// one instance can be evaluated any number of times, from any thread.
#[derive(Debug, Clone)]
pub struct TextTemplate {
    elements: Arc<[TemplateElement]>,
}

impl TextTemplate {
    pub fn of(elements: impl IntoIterator<Item = TemplateElement>) -> TextTemplate {
        TextTemplate {
            elements: elements.into_iter().collect(),
        }
    }

    pub fn elements(&self) -> &[TemplateElement] {
        &self.elements
    }

    /// Declared placeholders, in template order.
    pub fn arguments(&self) -> impl Iterator<Item = &Arg> {
        self.elements.iter().filter_map(|element| match element {
            TemplateElement::Arg(arg) => Some(arg),
            _ => None,
        })
    }

    /// Check `params` against every placeholder without building output.
    pub fn validate(&self, params: &TemplateParams) -> Result<(), TemplateError> {
        for arg in self.arguments() {
            match params.get(arg.name()) {
                Some(value) => arg.check(value)?,
                None if arg.is_optional() => {}
                None => return Err(TemplateError::MissingArgument(arg.name.clone())),
            }
        }
        Ok(())
    }

    /// Evaluate this template. The first missing or mismatched argument
    /// aborts the whole evaluation.
    pub fn eval(&self, params: &TemplateParams) -> Result<TextBuilder, TemplateError> {
        let mut result = Text::builder();
        for element in self.elements.iter() {
            append_element(&mut result, element, params)?;
        }
        Ok(result)
    }

    /// Evaluate and build in one step.
    pub fn apply(&self, params: &TemplateParams) -> Result<Text, TemplateError> {
        self.eval(params).map(|builder| builder.build())
    }

    /// Evaluate and deliver the result to `receiver`. Nothing is sent if
    /// evaluation fails.
    pub fn send(
        &self,
        receiver: &mut dyn MessageReceiver,
        params: &TemplateParams,
    ) -> Result<(), TemplateError> {
        let message = self.apply(params)?;
        receiver.send_message(message);
        Ok(())
    }

    /// Parse a template string into a sequence of elements.
    ///
    /// Syntax:
    /// - `{name}` → required `text` argument
    /// - `{name?}` → optional `text` argument
    /// - `{name:int}` / `{name:int?}` → typed argument, rendered with `Display`
    /// - `{{` / `}}` → literal braces
    /// - Everything else → literal
    pub fn parse(input: &str) -> Result<TextTemplate, TemplateError> {
        let mut elements = Vec::new();
        let mut literal_buf = String::new();
        let chars: Vec<char> = input.chars().collect();
        let len = chars.len();
        let mut i = 0;

        while i < len {
            if chars[i] == '{' {
                if i + 1 < len && chars[i + 1] == '{' {
                    literal_buf.push('{');
                    i += 2;
                    continue;
                }

                if !literal_buf.is_empty() {
                    elements.push(TemplateElement::Literal(std::mem::take(&mut literal_buf)));
                }

                let start = i + 1;
                let mut end = start;
                while end < len && chars[end] != '}' {
                    if chars[end] == '{' {
                        return Err(TemplateError::Parse(
                            "nested braces are not allowed".to_string(),
                        ));
                    }
                    end += 1;
                }

                if end == len {
                    return Err(TemplateError::Parse("unclosed brace".to_string()));
                }

                let content: String = chars[start..end].iter().collect();
                elements.push(TemplateElement::Arg(Self::parse_arg(content.trim())?));
                i = end + 1;
            } else if chars[i] == '}' {
                if i + 1 < len && chars[i + 1] == '}' {
                    literal_buf.push('}');
                    i += 2;
                    continue;
                }
                return Err(TemplateError::Parse(
                    "unmatched closing brace".to_string(),
                ));
            } else {
                literal_buf.push(chars[i]);
                i += 1;
            }
        }

        if !literal_buf.is_empty() {
            elements.push(TemplateElement::Literal(literal_buf));
        }

        Ok(TextTemplate::of(elements))
    }

    fn parse_arg(content: &str) -> Result<Arg, TemplateError> {
        let (content, optional) = match content.strip_suffix('?') {
            Some(rest) => (rest, true),
            None => (content, false),
        };

        let (name, kind) = match content.split_once(':') {
            Some((name, kind_name)) => {
                let kind = ValueKind::from_name(kind_name.trim()).ok_or_else(|| {
                    TemplateError::Parse(format!(
                        "unknown argument kind '{}' for '{}'",
                        kind_name.trim(),
                        name.trim()
                    ))
                })?;
                (name.trim(), kind)
            }
            None => (content.trim(), ValueKind::Text),
        };

        if name.is_empty() {
            return Err(TemplateError::Parse("empty braces".to_string()));
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(TemplateError::Parse(format!(
                "invalid argument name '{}'",
                name
            )));
        }

        let arg = Arg::displayed(name, kind);
        Ok(if optional { arg.optional() } else { arg })
    }
}

fn append_element(
    builder: &mut TextBuilder,
    element: &TemplateElement,
    params: &TemplateParams,
) -> Result<(), TemplateError> {
    match element {
        TemplateElement::Element(element) => element.append_to(builder),
        TemplateElement::Arg(arg) => match params.get(arg.name()) {
            Some(value) => {
                builder.append(arg.eval(value)?);
            }
            None if arg.is_optional() => {}
            None => return Err(TemplateError::MissingArgument(arg.name.clone())),
        },
        TemplateElement::Literal(s) => {
            builder.append(Text::of(s.as_str()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting() -> TextTemplate {
        TextTemplate::of(["Hello, ".into(), arg("name").into(), "!".into()])
    }

    #[test]
    fn hello_world() {
        let params = TemplateParams::new().with("name", Text::of("World"));
        let text = greeting().apply(&params).unwrap();
        assert_eq!(text.to_plain(), "Hello, World!");
        assert_eq!(text.children.len(), 3);
        assert_eq!(text.children[1], Text::of("World"));
    }

    #[test]
    fn literals_ignore_params() {
        let template = TextTemplate::of(["a".into(), 'b'.into(), 3i64.into(), true.into()]);
        let empty = template.apply(&TemplateParams::new()).unwrap();
        let noisy = template
            .apply(&TemplateParams::new().with("a", 1).with("b", "x"))
            .unwrap();
        assert_eq!(empty.to_plain(), "ab3true");
        assert_eq!(empty, noisy);
    }

    #[test]
    fn missing_required_argument() {
        let err = greeting().eval(&TemplateParams::new()).unwrap_err();
        assert!(matches!(&err, TemplateError::MissingArgument(name) if name == "name"));
        assert_eq!(
            err.to_string(),
            "Missing required argument \"name\" in TextTemplate."
        );
    }

    #[test]
    fn optional_argument_omitted() {
        let template = TextTemplate::of([
            "[".into(),
            optional_arg("prefix").into(),
            "]".into(),
            arg("name").into(),
        ]);
        let params = TemplateParams::new().with("name", Text::of("Alex"));
        let text = template.apply(&params).unwrap();
        assert_eq!(text.to_plain(), "[]Alex");
        assert_eq!(
            text.children,
            vec![Text::of("["), Text::of("]"), Text::of("Alex")]
        );
    }

    #[test]
    fn mismatched_argument_type() {
        let template = TextTemplate::of([arg_with("x", |n: i64| Text::of(format!("#{}", n))).into()]);
        let err = template
            .eval(&TemplateParams::new().with("x", "seven"))
            .unwrap_err();
        match &err {
            TemplateError::MismatchedArgument {
                expected,
                actual,
                name,
            } => {
                assert_eq!(*expected, ValueKind::Int);
                assert_eq!(*actual, ValueKind::String);
                assert_eq!(name, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Mismatched arguments in TextTemplate. Expected int got string for argument \"x\"."
        );
    }

    #[test]
    fn typed_transform_applies() {
        let template = TextTemplate::of([
            "Balance: ".into(),
            arg_with("coins", |n: i64| Text::of(format!("{} coins", n))).into(),
        ]);
        let text = template
            .apply(&TemplateParams::new().with("coins", 12))
            .unwrap();
        assert_eq!(text.to_plain(), "Balance: 12 coins");
    }

    #[test]
    fn first_error_aborts() {
        let template = TextTemplate::of([
            arg_with("a", |n: i64| Text::of(n.to_string())).into(),
            arg("b").into(),
        ]);
        // `a` mismatches before `b` is found missing
        let err = template
            .eval(&TemplateParams::new().with("a", false))
            .unwrap_err();
        assert!(matches!(err, TemplateError::MismatchedArgument { .. }));
    }

    #[test]
    fn reevaluation_is_independent() {
        let template = greeting();
        let first = template
            .apply(&TemplateParams::new().with("name", Text::of("Ann")))
            .unwrap();
        let second = template
            .apply(&TemplateParams::new().with("name", Text::of("Bo")))
            .unwrap();
        assert_eq!(first.to_plain(), "Hello, Ann!");
        assert_eq!(second.to_plain(), "Hello, Bo!");
    }

    #[test]
    fn format_elements_apply_to_result() {
        let template = TextTemplate::of([
            TextColor::Red.into(),
            TextStyle::bold().into(),
            Text::of("alert").into(),
        ]);
        let text = template.apply(&TemplateParams::new()).unwrap();
        assert_eq!(text.format.color, Some(TextColor::Red));
        assert_eq!(text.format.style.bold, Some(true));
        assert_eq!(text.to_plain(), "alert");
    }

    #[test]
    fn validate_matches_eval() {
        let template = greeting();
        assert!(template.validate(&TemplateParams::new()).is_err());
        assert!(template
            .validate(&TemplateParams::new().with("name", 4))
            .is_err());
        assert!(template
            .validate(&TemplateParams::new().with("name", Text::of("ok")))
            .is_ok());
    }

    #[test]
    fn arguments_in_order() {
        let template = TextTemplate::of([
            arg("first").into(),
            " ".into(),
            optional_arg("second").into(),
        ]);
        let names: Vec<&str> = template.arguments().map(Arg::name).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(template.arguments().nth(1).unwrap().is_optional());
    }

    #[test]
    fn parse_literal_only() {
        let t = TextTemplate::parse("Welcome to the server.").unwrap();
        assert_eq!(t.elements().len(), 1);
        assert!(matches!(&t.elements()[0], TemplateElement::Literal(s) if s == "Welcome to the server."));
    }

    #[test]
    fn parse_args() {
        let t = TextTemplate::parse("{player} has {count:int} items{suffix?}").unwrap();
        let args: Vec<(&str, ValueKind, bool)> = t
            .arguments()
            .map(|a| (a.name(), a.kind(), a.is_optional()))
            .collect();
        assert_eq!(
            args,
            vec![
                ("player", ValueKind::Text, false),
                ("count", ValueKind::Int, false),
                ("suffix", ValueKind::Text, true),
            ]
        );
        let text = t
            .apply(
                &TemplateParams::new()
                    .with("player", Text::of("Kai"))
                    .with("count", 3),
            )
            .unwrap();
        assert_eq!(text.to_plain(), "Kai has 3 items");
    }

    #[test]
    fn parse_escaped_braces() {
        let t = TextTemplate::parse("Use {{braces}} here.").unwrap();
        let text = t.apply(&TemplateParams::new()).unwrap();
        assert_eq!(text.to_plain(), "Use {braces} here.");
    }

    #[test]
    fn parse_errors() {
        assert!(TextTemplate::parse("Bad {} here").is_err());
        assert!(TextTemplate::parse("Bad {?} here").is_err());
        assert!(TextTemplate::parse("Bad {outer{inner}} here").is_err());
        assert!(TextTemplate::parse("Bad {unclosed here").is_err());
        assert!(TextTemplate::parse("Bad } here").is_err());
        assert!(TextTemplate::parse("Bad {x:uuid} here").is_err());
        assert!(TextTemplate::parse("Bad {two words} here").is_err());
    }

    #[test]
    fn template_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TextTemplate>();
        assert_send_sync::<TemplateParams>();
    }
}
