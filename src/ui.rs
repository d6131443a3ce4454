//! Terminal presentation helpers shared by the commands.

use crate::core::form::ValidationError;
use crate::core::model::Category;
use console::style;
use dialoguer::theme::ColorfulTheme;

/// Theme used by every interactive prompt.
pub fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

/// One line per blank required input.
pub fn print_validation(err: &ValidationError) {
    eprintln!("{}", style("Please fix the following:").red().bold());
    for (field, message) in &err.0 {
        eprintln!("  {} {}: {}", style("•").red(), style(field).bold(), message);
    }
}

/// Category name for an optional id; "Uncategorized" when unset or unknown.
pub fn category_name<'a>(categories: &'a [Category], id: Option<&str>) -> &'a str {
    id.and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.name.as_str())
        .unwrap_or("Uncategorized")
}
