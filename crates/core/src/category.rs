use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tool group that can be switched on or off at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Accounts,
    Campaigns,
    Leads,
    Emails,
    Analytics,
    BackgroundJobs,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Accounts,
        Category::Campaigns,
        Category::Leads,
        Category::Emails,
        Category::Analytics,
        Category::BackgroundJobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Accounts => "accounts",
            Category::Campaigns => "campaigns",
            Category::Leads => "leads",
            Category::Emails => "emails",
            Category::Analytics => "analytics",
            Category::BackgroundJobs => "background_jobs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}

/// Result of parsing a category filter such as `TOOL_CATEGORIES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    /// Categories to load, in canonical order and without duplicates.
    pub enabled: Vec<Category>,
    /// Names that matched no category.
    pub ignored: Vec<String>,
    /// Whether a non-empty filter narrowed the set.
    pub filtered: bool,
}

impl CategorySelection {
    pub fn all() -> Self {
        Self {
            enabled: Category::ALL.to_vec(),
            ignored: Vec::new(),
            filtered: false,
        }
    }

    /// Parse a list of category names.
    ///
    /// Unknown names are collected in `ignored`. If nothing valid remains,
    /// every category is enabled.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut enabled = Vec::new();
        let mut ignored = Vec::new();

        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match name.parse::<Category>() {
                Ok(category) if !enabled.contains(&category) => enabled.push(category),
                Ok(_) => {}
                Err(UnknownCategory(name)) => ignored.push(name),
            }
        }

        if enabled.is_empty() {
            return Self {
                ignored,
                ..Self::all()
            };
        }

        enabled.sort();
        Self {
            enabled,
            ignored,
            filtered: true,
        }
    }

    /// Parse a comma-separated list. `None` or blank enables everything.
    pub fn from_csv(value: Option<&str>) -> Self {
        match value {
            Some(csv) if !csv.trim().is_empty() => Self::from_names(csv.split(',')),
            _ => Self::all(),
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.enabled.contains(&category)
    }
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_names() {
        assert_eq!("accounts".parse::<Category>(), Ok(Category::Accounts));
        assert_eq!(" Leads ".parse::<Category>(), Ok(Category::Leads));
        assert_eq!("background-jobs".parse::<Category>(), Ok(Category::BackgroundJobs));
        assert!("billing".parse::<Category>().is_err());
    }

    #[test]
    fn test_selection_from_csv_filters_and_orders() {
        let selection = CategorySelection::from_csv(Some("leads, accounts,leads"));

        assert_eq!(selection.enabled, vec![Category::Accounts, Category::Leads]);
        assert!(selection.ignored.is_empty());
        assert!(selection.filtered);
        assert!(!selection.contains(Category::Emails));
    }

    #[test]
    fn test_unknown_categories_are_reported() {
        let selection = CategorySelection::from_csv(Some("emails,billing,crm"));

        assert_eq!(selection.enabled, vec![Category::Emails]);
        assert_eq!(selection.ignored, vec!["billing".to_string(), "crm".to_string()]);
    }

    #[test]
    fn test_no_valid_categories_enables_all() {
        let selection = CategorySelection::from_csv(Some("billing"));

        assert_eq!(selection.enabled, Category::ALL.to_vec());
        assert_eq!(selection.ignored, vec!["billing".to_string()]);
        assert!(!selection.filtered);
    }

    #[test]
    fn test_missing_filter_enables_all() {
        assert_eq!(CategorySelection::from_csv(None), CategorySelection::all());
        assert_eq!(CategorySelection::from_csv(Some("  ")), CategorySelection::all());
    }
}
