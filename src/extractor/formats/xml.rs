use regex::Regex;

/// Pulls visible text out of word-processor XML parts by matching text runs,
/// tabs, line breaks and paragraph ends for one namespace prefix.
pub struct XmlTextScanner {
    tokens: Regex,
    tags: Regex,
}

impl XmlTextScanner {
    /// `prefix` is the namespace prefix of run elements (`w` for docx,
    /// `hp` for hwpx).
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let p = regex::escape(prefix);
        let pattern = format!(
            r"(?s)<{p}:t(?:\s[^>]*[^/])?>(?P<text>.*?)</{p}:t>|<{p}:t(?:\s[^>]*)?/>|(?P<tab><{p}:tab\s*/>)|(?P<br><{p}:(?:br|lineBreak)(?:\s[^>]*)?/>)|(?P<para></{p}:p>)"
        );

        Ok(Self {
            tokens: Regex::new(&pattern)?,
            tags: Regex::new(r"<[^>]*>")?,
        })
    }

    pub fn extract(&self, xml: &str) -> String {
        let mut out = String::new();

        for caps in self.tokens.captures_iter(xml) {
            if let Some(text) = caps.name("text") {
                let inner = self.tags.replace_all(text.as_str(), "");
                out.push_str(&unescape(&inner));
            } else if caps.name("tab").is_some() {
                out.push('\t');
            } else if caps.name("br").is_some() {
                out.push('\n');
            } else if caps.name("para").is_some() {
                out.push('\n');
            }
        }

        out.trim_end().to_string()
    }
}

/// Decode the predefined XML entities and numeric character references.
pub fn unescape(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];

        let Some(end) = after.find(';') else {
            out.push_str(after);
            return out;
        };

        let entity = &after[1..end];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
