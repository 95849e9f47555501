//! A small selector language for matching panels.
//!
//! Supported: type selectors (`a`, `div`), the universal selector `*`,
//! classes (`.card-widget`), ids (`#aside-content`) and the descendant
//! combinator (whitespace). That is every pattern the effect families are
//! configured with; anything else is rejected as malformed.

use crate::error::EffectError;

/// One compound selector: an optional tag plus classes and ids, all of
/// which must hold for the same element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    /// Lower-cased tag name; `None` for `*` or when omitted.
    pub tag: Option<String>,
    /// Required id.
    pub id: Option<String>,
    /// Required classes.
    pub classes: Vec<String>,
}

impl Compound {
    /// Whether an element with the given tag, id and classes matches.
    #[must_use]
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &[String]) -> bool {
        if let Some(want) = &self.tag {
            if !want.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if id != Some(want.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| classes.contains(c))
    }
}

/// A parsed descendant-combinator selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    /// Compounds from outermost ancestor to the subject element.
    compounds: Vec<Compound>,
}

impl Selector {
    /// Parse selector text.
    pub fn parse(source: &str) -> Result<Self, EffectError> {
        let invalid = |reason: String| EffectError::SelectorInvalid {
            selector: source.to_owned(),
            reason,
        };

        let compounds = source
            .split_whitespace()
            .map(|part| parse_compound(part).map_err(&invalid))
            .collect::<Result<Vec<_>, _>>()?;
        if compounds.is_empty() {
            return Err(invalid("empty selector".to_owned()));
        }
        Ok(Self {
            source: source.trim().to_owned(),
            compounds,
        })
    }

    /// Normalized selector text (suitable for a host's native query API).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compounds from outermost ancestor to the subject.
    #[must_use]
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// The compound the matched element itself must satisfy.
    #[must_use]
    pub fn subject(&self) -> &Compound {
        // `parse` rejects empty selectors
        &self.compounds[self.compounds.len() - 1]
    }

    /// The ancestor compounds, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Compound> {
        self.compounds[..self.compounds.len() - 1].iter().rev()
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(part: &str) -> Result<Compound, String> {
    let mut compound = Compound::default();
    let mut chars = part.char_indices().peekable();

    // Leading tag or universal selector.
    match chars.peek() {
        Some(&(_, '*')) => {
            let _ = chars.next();
        }
        Some(&(_, c)) if c.is_ascii_alphabetic() => {
            let tag = take_ident(part, &mut chars);
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        _ => {}
    }

    while let Some((pos, c)) = chars.next() {
        match c {
            '.' | '#' => {
                let name = take_ident(part, &mut chars);
                if name.is_empty() {
                    return Err(format!("missing name after '{c}' at {pos}"));
                }
                if name.starts_with(|ch: char| ch.is_ascii_digit()) {
                    return Err(format!("name '{name}' starts with a digit"));
                }
                if c == '.' {
                    compound.classes.push(name.to_owned());
                } else if compound.id.replace(name.to_owned()).is_some() {
                    return Err(format!("second id '#{name}'"));
                }
            }
            other => return Err(format!("unexpected '{other}' at {pos}")),
        }
    }
    Ok(compound)
}

fn take_ident<'a>(
    part: &'a str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'a>>,
) -> &'a str {
    let start = chars.peek().map_or(part.len(), |&(i, _)| i);
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        end = i + c.len_utf8();
        let _ = chars.next();
    }
    &part[start..end]
}
