use crate::error::{Result, ZoneDbError};
use crate::traits::Escaper;
use crate::types::SqlValue;

/// Upper bound on a rendered statement unless configured otherwise.
pub const DEFAULT_MAX_STATEMENT_LEN: usize = 4096;

/// Renders a statement template.
///
/// Two kinds of placeholder are understood:
/// - named tokens such as `:name` or `:id`, bound with [`bind`](Self::bind)
/// - printf-style slots (`%d`, `%i`, `%u`, `%ld`, `%lu`, `%s`, `%%`), filled
///   in order with [`arg`](Self::arg). Slots are only interpreted when at
///   least one argument was given, so `%` in a purely named template (a
///   `LIKE` pattern, say) stays literal.
///
/// The template is scanned once from left to right. Inserted text is never
/// scanned again, so a value containing `:name` cannot trigger another
/// substitution. Tokens nobody bound are left verbatim.
///
/// # Example
/// ```
/// use zonedb::builders::StatementBuilder;
/// use zonedb::drivers::StandardEscaper;
///
/// let sql = StatementBuilder::new("SELECT * FROM records WHERE name=':name'")
///     .bind(":name", "o'hara.example")
///     .build(&StandardEscaper)
///     .unwrap();
/// assert_eq!(sql, "SELECT * FROM records WHERE name='o''hara.example'");
/// ```
#[derive(Debug, Clone)]
pub struct StatementBuilder<'t> {
    template: &'t str,
    bindings: Vec<(String, SqlValue)>,
    args: Vec<SqlValue>,
    max_len: usize,
}

impl<'t> StatementBuilder<'t> {
    pub fn new(template: &'t str) -> Self {
        Self {
            template,
            bindings: Vec::new(),
            args: Vec::new(),
            max_len: DEFAULT_MAX_STATEMENT_LEN,
        }
    }

    /// Set the largest rendered statement accepted, in bytes.
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Bind a named token. Binding the same token twice keeps the last value.
    pub fn bind<V: Into<SqlValue>>(mut self, token: &str, value: V) -> Self {
        let value = value.into();
        match self.bindings.iter_mut().find(|(t, _)| t == token) {
            Some(slot) => slot.1 = value,
            None => self.bindings.push((token.to_string(), value)),
        }
        self
    }

    /// Append a value for the next positional slot.
    pub fn arg<V: Into<SqlValue>>(mut self, value: V) -> Self {
        self.args.push(value.into());
        self
    }

    /// Render the statement, escaping text with `escaper`.
    pub fn build<E: Escaper + ?Sized>(&self, escaper: &E) -> Result<String> {
        let mut named = Vec::with_capacity(self.bindings.len());
        for (token, value) in &self.bindings {
            if token.is_empty() {
                return Err(ZoneDbError::StatementFormat(
                    "empty placeholder token".to_string(),
                ));
            }
            named.push((token.as_str(), render_value(value, escaper)?));
        }
        // Longest token first so `:idx` is not taken for `:id` + "x".
        named.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let positional = !self.args.is_empty();
        let mut args = self.args.iter();
        let mut out = String::with_capacity(self.template.len() + 64);
        let mut rest = self.template;

        while !rest.is_empty() {
            if positional && rest.starts_with('%') {
                let consumed = Self::render_slot(rest, &mut args, escaper, &mut out)?;
                rest = &rest[consumed..];
                continue;
            }

            if let Some((token, value)) = named.iter().find(|(t, _)| rest.starts_with(t)) {
                out.push_str(value);
                rest = &rest[token.len()..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(ch) = chars.next() {
                out.push(ch);
            }
            rest = chars.as_str();
        }

        let unused = args.count();
        if unused > 0 {
            return Err(ZoneDbError::StatementFormat(format!(
                "{} argument(s) left over after filling template",
                unused
            )));
        }

        if out.len() > self.max_len {
            return Err(ZoneDbError::StatementTooLong {
                len: out.len(),
                max: self.max_len,
            });
        }

        Ok(out)
    }

    /// Renders the slot at the start of `rest` into `out` and returns how
    /// many template bytes it consumed.
    fn render_slot<'a, E: Escaper + ?Sized>(
        rest: &str,
        args: &mut impl Iterator<Item = &'a SqlValue>,
        escaper: &E,
        out: &mut String,
    ) -> Result<usize> {
        let bytes = rest.as_bytes();
        if bytes.get(1) == Some(&b'%') {
            out.push('%');
            return Ok(2);
        }

        let mut idx = 1;
        while idx < 3 && bytes.get(idx) == Some(&b'l') {
            idx += 1;
        }

        let conversion = match bytes.get(idx) {
            Some(c @ (b'd' | b'i' | b'u' | b's')) => *c,
            _ => {
                let shown: String = rest.chars().take(idx + 1).collect();
                return Err(ZoneDbError::StatementFormat(format!(
                    "unsupported conversion '{}' in template",
                    shown
                )));
            }
        };

        let value = args.next().ok_or_else(|| {
            ZoneDbError::StatementFormat("template has more slots than arguments".to_string())
        })?;

        let rendered = match (conversion, value) {
            (b's', value) => render_value(value, escaper)?,
            (_, SqlValue::Text(text)) => {
                return Err(ZoneDbError::StatementFormat(format!(
                    "numeric slot given text '{}'",
                    text
                )))
            }
            (b'u', SqlValue::Int(n)) if *n < 0 => {
                return Err(ZoneDbError::StatementFormat(format!(
                    "unsigned slot given negative value {}",
                    n
                )))
            }
            (_, value) => render_value(value, escaper)?,
        };

        out.push_str(&rendered);
        Ok(idx + 1)
    }
}

fn render_value<E: Escaper + ?Sized>(value: &SqlValue, escaper: &E) -> Result<String> {
    match value {
        SqlValue::Null => Ok("NULL".to_string()),
        SqlValue::Text(text) => escaper.escape(text),
        SqlValue::Int(n) => Ok(n.to_string()),
        SqlValue::UInt(n) => Ok(n.to_string()),
    }
}
