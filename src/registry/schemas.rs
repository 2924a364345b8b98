//! Parameter schemas and catalog
//!
//! JSON-schema descriptors an orchestrator can hand to a model, plus a
//! summary of the registered operations by category.

use serde::Serialize;
use serde_json::{Value, json};

use crate::registry::functions::{Category, FunctionName};
use crate::storage::discovery::{DAYS_RANGE, DEFAULT_DAYS, DEFAULT_LIMIT, LIMIT_RANGE};
use crate::storage::{SearchType, UpdateMode};

/// Summary of the registered operations.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub total_functions: usize,
    pub function_names: Vec<&'static str>,
    pub essential_functions: Vec<&'static str>,
    pub intermediate_functions: Vec<&'static str>,
    pub advanced_functions: Vec<&'static str>,
}

pub fn catalog() -> Catalog {
    let in_category = |category: Category| -> Vec<&'static str> {
        FunctionName::ALL
            .iter()
            .filter(|name| name.category() == category)
            .map(FunctionName::as_str)
            .collect()
    };

    Catalog {
        total_functions: FunctionName::ALL.len(),
        function_names: FunctionName::ALL.iter().map(FunctionName::as_str).collect(),
        essential_functions: in_category(Category::Essential),
        intermediate_functions: in_category(Category::Intermediate),
        advanced_functions: in_category(Category::Advanced),
    }
}

/// Schemas for every registered operation, in registry order.
pub fn function_schemas() -> Vec<Value> {
    FunctionName::ALL.iter().map(|name| schema(*name)).collect()
}

fn string_param(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

pub fn schema(name: FunctionName) -> Value {
    let (description, properties, required): (&str, Value, Vec<&str>) = match name {
        FunctionName::ListDirectory => (
            "List files and folders in the documents directory",
            json!({
                "path": {
                    "type": "string",
                    "description": "Relative path within documents folder (default: root)",
                    "default": "."
                }
            }),
            vec![],
        ),
        FunctionName::ReadFile => (
            "Read the content of a markdown file",
            json!({ "filename": string_param("Name or path of the markdown file to read") }),
            vec!["filename"],
        ),
        FunctionName::CreateFile => (
            "Create a new markdown file with optional initial content",
            json!({
                "filename": string_param("Name or path of the new markdown file"),
                "content": {
                    "type": "string",
                    "description": "Initial content for the file",
                    "default": ""
                }
            }),
            vec!["filename"],
        ),
        FunctionName::UpdateFile => (
            "Update the content of an existing markdown file",
            json!({
                "filename": string_param("Name or path of the file to update"),
                "content": string_param("New content to add to the file"),
                "mode": {
                    "type": "string",
                    "enum": UpdateMode::ALL,
                    "description": "How to update the file: replace all content, append to end, or prepend to beginning",
                    "default": UpdateMode::default().as_str()
                }
            }),
            vec!["filename", "content"],
        ),
        FunctionName::DeleteFile => (
            "Delete a markdown file",
            json!({ "filename": string_param("Name or path of the file to delete") }),
            vec!["filename"],
        ),
        FunctionName::CreateDirectory => (
            "Create a new directory for organizing files",
            json!({ "dirname": string_param("Name or path of the new directory") }),
            vec!["dirname"],
        ),
        FunctionName::RenameFile => (
            "Rename a file or directory",
            json!({
                "old_name": string_param("Current name or path of the file/directory"),
                "new_name": string_param("New name for the file/directory")
            }),
            vec!["old_name", "new_name"],
        ),
        FunctionName::MoveFile => (
            "Move a file to a different location within the documents folder",
            json!({
                "source": string_param("Current path of the file to move"),
                "destination": string_param("Destination directory or full path")
            }),
            vec!["source", "destination"],
        ),
        FunctionName::SearchFiles => (
            "Search for files by content or filename patterns",
            json!({
                "query": string_param("Text to search for"),
                "search_type": {
                    "type": "string",
                    "enum": SearchType::ALL,
                    "description": "Search in file contents or filenames",
                    "default": SearchType::default().as_str()
                }
            }),
            vec!["query"],
        ),
        FunctionName::CopyFile => (
            "Copy a file to a new location",
            json!({
                "source": string_param("Source file path to copy"),
                "destination": string_param("Destination file path")
            }),
            vec!["source", "destination"],
        ),
        FunctionName::GetFileInfo => (
            "Get detailed information about a file including size, word count, and structure",
            json!({ "filename": string_param("Name or path of the file to analyze") }),
            vec!["filename"],
        ),
        FunctionName::CreateBackup => (
            "Create a timestamped backup copy of a file",
            json!({ "filename": string_param("Name or path of the file to backup") }),
            vec!["filename"],
        ),
        FunctionName::ListRecentFiles => (
            "List recently modified files within a specified time period",
            json!({
                "days": {
                    "type": "integer",
                    "description": format!("Number of days to look back ({}-{})", DAYS_RANGE.0, DAYS_RANGE.1),
                    "default": DEFAULT_DAYS,
                    "minimum": DAYS_RANGE.0,
                    "maximum": DAYS_RANGE.1
                },
                "limit": {
                    "type": "integer",
                    "description": format!("Maximum number of files to return ({}-{})", LIMIT_RANGE.0, LIMIT_RANGE.1),
                    "default": DEFAULT_LIMIT,
                    "minimum": LIMIT_RANGE.0,
                    "maximum": LIMIT_RANGE.1
                }
            }),
            vec![],
        ),
    };

    let mut parameters = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        parameters["required"] = json!(required);
    }

    json!({
        "name": name.as_str(),
        "description": description,
        "parameters": parameters
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_function_has_a_schema() {
        let schemas = function_schemas();
        assert_eq!(schemas.len(), 13);
        for (schema, name) in schemas.iter().zip(FunctionName::ALL) {
            assert_eq!(schema["name"], name.as_str());
            assert_eq!(schema["parameters"]["type"], "object");
        }
    }

    #[test]
    fn update_schema_lists_modes() {
        let update = schema(FunctionName::UpdateFile);
        assert_eq!(
            update["parameters"]["properties"]["mode"]["enum"],
            json!(["replace", "append", "prepend"])
        );
        assert_eq!(update["parameters"]["required"], json!(["filename", "content"]));
    }

    #[test]
    fn catalog_groups_by_category() {
        let summary = catalog();
        assert_eq!(summary.total_functions, 13);
        assert_eq!(summary.intermediate_functions, vec!["create_directory", "rename_file", "move_file"]);
    }
}
