use regex::Regex;

/// Decides which link inside an item container is the item's own page
#[derive(Debug)]
pub struct LinkFilter {
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Compile a filter from include and exclude patterns
    pub fn new(include_patterns: &[String], exclude_patterns: &[String]) -> Result<Self, regex::Error> {
        let mut include_regexes = Vec::with_capacity(include_patterns.len());
        for pattern in include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(exclude_patterns.len());
        for pattern in exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            include_regexes,
            exclude_regexes,
        })
    }

    /// Whether a resolved link target points at an item page
    pub fn accepts(&self, url: &str) -> bool {
        // Exclusions take precedence
        if self.exclude_regexes.iter().any(|regex| regex.is_match(url)) {
            return false;
        }

        // With no include patterns every remaining link is accepted
        self.include_regexes.is_empty() || self.include_regexes.iter().any(|regex| regex.is_match(url))
    }
}
