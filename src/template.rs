use crate::error::TemplateError;

/// The prompt used when no template is configured.
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "Summarize the following text in one concise line: {text}";

const PLACEHOLDER: &str = "text";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Text,
}

/// A prompt pattern with exactly one `{text}` placeholder.
///
/// Literal braces are written as `{{` and `}}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses a template, rejecting unknown placeholders, unbalanced braces and
    /// any placeholder count other than one.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut placeholders = 0;
        let mut chars = source.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' if chars.peek().map(|(_, next)| *next) == Some('{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().map(|(_, next)| *next) == Some('}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        if c == '{' {
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::UnbalancedBrace { position });
                    }
                    if name != PLACEHOLDER {
                        return Err(TemplateError::UnknownPlaceholder(name));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Text);
                    placeholders += 1;
                }
                '}' => return Err(TemplateError::UnbalancedBrace { position }),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if placeholders != 1 {
            return Err(TemplateError::PlaceholderCount(placeholders));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Substitutes `text` verbatim into the placeholder.
    pub fn render(&self, text: &str) -> String {
        let mut prompt = String::with_capacity(self.source.len() + text.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => prompt.push_str(literal),
                Segment::Text => prompt.push_str(text),
            }
        }
        prompt
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_PROMPT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Literal(
                    "Summarize the following text in one concise line: ".to_string(),
                ),
                Segment::Text,
            ],
        }
    }
}
