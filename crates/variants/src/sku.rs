use serde::{Deserialize, Serialize};

/// How a synthesized SKU is composed from a base fragment and option values.
///
/// Segments are the base followed by each value. Blank segments are skipped and
/// internal whitespace collapses to `-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkuTemplate {
    pub base: String,
    pub separator: String,
    pub uppercase: bool,
}

impl Default for SkuTemplate {
    fn default() -> Self {
        Self {
            base: String::new(),
            separator: "-".to_string(),
            uppercase: false,
        }
    }
}

impl SkuTemplate {
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn render<'a, I>(&'a self, values: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let segments: Vec<String> = core::iter::once(self.base.as_str())
            .chain(values)
            .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join("-"))
            .filter(|segment| !segment.is_empty())
            .collect();

        let sku = segments.join(&self.separator);
        if self.uppercase {
            sku.to_uppercase()
        } else {
            sku
        }
    }
}
