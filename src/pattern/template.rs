//! Templated step pattern with `{field}` placeholders.

use lazy_regex::regex;
use regex::Regex;

use crate::error::BuildError;

use super::{captures_of, RawCapture};

/// Pattern with `{name}` / `{name:type}` fields, compiled to an anchored
/// regex with named groups.
///
/// Supported field types: `d` (digits), `w` (word characters), `S`
/// (non-space) and untyped (non-greedy any). An unnamed field `{}`
/// captures positionally, to be named by the owning definition. Literal
/// braces are written `{{` and `}}`.
#[derive(Clone, Debug)]
pub struct Template {
    source: String,
    regex: Regex,
    slots: Vec<String>,
}

impl Template {
    /// Compiles a new [`Template`] pattern.
    ///
    /// # Errors
    ///
    /// If a field is unbalanced, its name is not an identifier, or its
    /// type is unsupported.
    pub fn new(pattern: impl Into<String>) -> Result<Self, BuildError> {
        let source = pattern.into();
        let (regex, slots) = compile(&source)?;
        Ok(Self { source, regex, slots })
    }

    /// Original pattern text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Indicates whether the whole `text` matches the template.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Extracts the template's fields from `text`.
    #[must_use]
    pub fn extract(&self, text: &str) -> Option<Vec<RawCapture>> {
        captures_of(&self.regex, text)
    }

    /// Names of the template's named fields, in field order.
    #[must_use]
    pub fn slot_names(&self) -> Vec<String> {
        self.slots.clone()
    }
}

fn compile(source: &str) -> Result<(Regex, Vec<String>), BuildError> {
    let err = |message: &str| BuildError::Template {
        pattern: source.to_owned(),
        message: message.to_owned(),
    };

    let mut pattern = String::from("^");
    let mut slots = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                _ = chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                _ = chars.next();
                literal.push('}');
            }
            '{' => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();

                let mut field = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    field.push(c);
                }
                if !closed {
                    return Err(err("unbalanced '{'"));
                }

                let (name, ty) = match field.split_once(':') {
                    Some((name, ty)) => (name, ty),
                    None => (field.as_str(), ""),
                };
                let group_re = match ty {
                    "" => ".+?",
                    "d" => r"\d+",
                    "w" => r"\w+",
                    "S" => r"\S+",
                    unsupported => {
                        return Err(err(&format!(
                            "unsupported field type \"{unsupported}\"",
                        )));
                    }
                };

                if name.is_empty() {
                    pattern.push('(');
                    pattern.push_str(group_re);
                    pattern.push(')');
                } else if regex!(r"^[A-Za-z_][A-Za-z0-9_]*$").is_match(name) {
                    pattern.push_str(&format!("(?P<{name}>{group_re})"));
                    slots.push(name.to_owned());
                } else {
                    return Err(err(&format!("invalid field name \"{name}\"")));
                }
            }
            '}' => return Err(err("unbalanced '}'")),
            _ => literal.push(c),
        }
    }
    pattern.push_str(&regex::escape(&literal));
    pattern.push('$');

    let regex = Regex::new(&pattern).map_err(|e| BuildError::Template {
        pattern: source.to_owned(),
        message: e.to_string(),
    })?;
    Ok((regex, slots))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_fields_extract_by_name() {
        let p = Template::new("there are {n} cukes").unwrap();
        let caps = p.extract("there are 5 cukes").unwrap();
        assert_eq!(caps, vec![(Some("n".to_owned()), "5".to_owned())]);
        assert_eq!(p.slot_names(), vec!["n"]);
    }

    #[test]
    fn typed_fields_constrain_the_match() {
        let p = Template::new("I lose {euro:d} Euro").unwrap();
        assert!(p.is_match("I lose 3 Euro"));
        assert!(!p.is_match("I lose three Euro"));
    }

    #[test]
    fn unnamed_field_captures_positionally() {
        let p = Template::new("I pay {} Euro").unwrap();
        let caps = p.extract("I pay 2 Euro").unwrap();
        assert_eq!(caps, vec![(None, "2".to_owned())]);
        assert!(p.slot_names().is_empty());
    }

    #[test]
    fn fieldless_template_is_a_literal_match() {
        let p = Template::new("I have a wallet").unwrap();
        assert!(p.is_match("I have a wallet"));
        assert!(!p.is_match("I have a purse"));
        assert_eq!(p.extract("I have a wallet"), Some(Vec::new()));
    }

    #[test]
    fn literal_braces_escape() {
        let p = Template::new("a {{json}} blob with {n}").unwrap();
        let caps = p.extract("a {json} blob with 7").unwrap();
        assert_eq!(caps, vec![(Some("n".to_owned()), "7".to_owned())]);
    }

    #[test]
    fn regex_metacharacters_in_literals_are_inert() {
        let p = Template::new("I have (exactly) {n} cukes").unwrap();
        assert!(p.is_match("I have (exactly) 5 cukes"));
        assert!(!p.is_match("I have exactly 5 cukes"));
    }

    #[test]
    fn unbalanced_braces_fail_construction() {
        assert!(matches!(
            Template::new("I have {n cukes"),
            Err(BuildError::Template { .. }),
        ));
        assert!(matches!(
            Template::new("I have n} cukes"),
            Err(BuildError::Template { .. }),
        ));
    }

    #[test]
    fn bad_field_name_or_type_fails_construction() {
        assert!(Template::new("I have {2n} cukes").is_err());
        assert!(Template::new("I have {n:q} cukes").is_err());
    }

    #[test]
    fn untyped_fields_do_not_swallow_neighbors() {
        let p = Template::new("{a} plus {b}").unwrap();
        let caps = p.extract("1 plus 2").unwrap();
        assert_eq!(
            caps,
            vec![
                (Some("a".to_owned()), "1".to_owned()),
                (Some("b".to_owned()), "2".to_owned()),
            ],
        );
    }
}
