//! Category display formatting

use tabled::{settings::Style, Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Active")]
    active: String,
}

/// Format categories as a table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'fintrack init' to create default categories."
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        id: c.id.to_string(),
        name: if c.icon.is_empty() {
            c.name.clone()
        } else {
            format!("{} {}", c.icon, c.name)
        },
        kind: c.kind.to_string(),
        color: c.color.clone(),
        active: yes_no(c.is_active).to_string(),
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format category details
pub fn format_category_details(category: &Category) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:          {}\n", category.id));
    output.push_str(&format!("  Kind:        {}\n", category.kind));
    output.push_str(&format!("  Active:      {}\n", yes_no(category.is_active)));
    output.push_str(&format!("  Color:       {}\n", category.color));
    if !category.icon.is_empty() {
        output.push_str(&format!("  Icon:        {}\n", category.icon));
    }
    if !category.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", category.description));
    }

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        category.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;

    #[test]
    fn test_format_empty_list() {
        assert!(format_category_list(&[]).contains("No categories found"));
    }

    #[test]
    fn test_format_list_and_details() {
        let category = Category::new("Groceries", EntryKind::Expense).with_description("Food at home");
        let list = format_category_list(std::slice::from_ref(&category));
        assert!(list.contains("Groceries"));
        assert!(list.contains("Expense"));
        assert!(list.contains(&category.id.to_string()));

        let details = format_category_details(&category);
        assert!(details.contains("Description: Food at home"));
        assert!(!details.contains("Icon:"));
    }
}
