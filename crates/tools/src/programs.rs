//! Program documents tool: text of the handbooks and requirement sheets
//! stored under `<programs_dir>/<program_name>/`.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use switchyard_core::error::ToolError;
use switchyard_core::tool::{ParamSpec, Tool, ToolOutput};
use tracing::{debug, warn};

pub struct ProgramDetailsTool {
    dir: PathBuf,
}

impl ProgramDetailsTool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Tool for ProgramDetailsTool {
    fn name(&self) -> &str {
        "get_program_details"
    }

    fn description(&self) -> &str {
        "Get the official documents for a degree program (requirements, core and \
         elective courses, policies). program_name is the program's folder name, \
         e.g. \"MSCS\"."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required("program_name", "str")]
    }

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let name = arguments["program_name"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'program_name' argument".into()))?
            .trim()
            .to_string();

        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Ok(ToolOutput::text(format!("Invalid program name: {name}")));
        }

        let folder = self.dir.join(&name);
        if !folder.is_dir() {
            debug!(program = %name, "Program folder does not exist");
            return Ok(ToolOutput::text(format!("Program {name} does not exist.")));
        }

        let documents = tokio::task::spawn_blocking(move || read_documents(&folder))
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "get_program_details".into(),
                reason: e.to_string(),
            })?;

        if documents.is_empty() {
            return Ok(ToolOutput::text(format!(
                "No program details found in the program folder: {name}"
            )));
        }

        debug!(program = %name, documents = documents.len(), "Loaded program documents");
        Ok(ToolOutput::Data(Value::from(documents)))
    }
}

/// Extract text from every readable document in the folder, in file-name
/// order. Unreadable files are logged and skipped.
fn read_documents(folder: &Path) -> Vec<String> {
    let mut paths: Vec<PathBuf> = match std::fs::read_dir(folder) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(e) => {
            warn!(folder = %folder.display(), error = %e, "Cannot list program folder");
            return Vec::new();
        }
    };
    paths.sort();

    paths
        .iter()
        .filter_map(|path| match extract_text(path) {
            Ok(Some(text)) => Some(flatten(&text)),
            Ok(None) => None,
            Err(reason) => {
                warn!(file = %path.display(), %reason, "Skipping unreadable program document");
                None
            }
        })
        .collect()
}

/// `Ok(None)` for file types we don't read.
fn extract_text(path: &Path) -> Result<Option<String>, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => {
            // pdf-extract panics on some malformed files
            let owned = path.to_path_buf();
            std::panic::catch_unwind(move || pdf_extract::extract_text(&owned))
                .map_err(|_| "PDF parser panicked".to_string())?
                .map(Some)
                .map_err(|e| e.to_string())
        }
        Some("txt") | Some("md") => std::fs::read_to_string(path)
            .map(Some)
            .map_err(|e| e.to_string()),
        _ => Ok(None),
    }
}

fn flatten(text: &str) -> String {
    text.replace('\r', "").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn programs_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mscs = dir.path().join("MSCS");
        std::fs::create_dir(&mscs).unwrap();
        std::fs::write(mscs.join("a_overview.txt"), "Master of Science\nin Computer Science\r\n").unwrap();
        std::fs::write(mscs.join("b_specializations.md"), "# Machine Learning\nCS 7641").unwrap();
        std::fs::write(mscs.join("notes.docx"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("EMPTY")).unwrap();
        dir
    }

    async fn run(tool: &ProgramDetailsTool, name: &str) -> Value {
        match tool.execute(json!({ "program_name": name })).await.unwrap() {
            ToolOutput::Data(v) => v,
            ToolOutput::Handoff(_) => panic!("unexpected handoff"),
        }
    }

    #[tokio::test]
    async fn reads_text_documents_in_order() {
        let dir = programs_dir();
        let tool = ProgramDetailsTool::new(dir.path());

        let docs = run(&tool, "MSCS").await;
        assert_eq!(
            docs,
            json!([
                "Master of Science in Computer Science ",
                "# Machine Learning CS 7641"
            ])
        );
    }

    #[tokio::test]
    async fn missing_program() {
        let dir = programs_dir();
        let tool = ProgramDetailsTool::new(dir.path());
        assert_eq!(run(&tool, "PhD").await, json!("Program PhD does not exist."));
    }

    #[tokio::test]
    async fn folder_without_documents() {
        let dir = programs_dir();
        let tool = ProgramDetailsTool::new(dir.path());
        assert_eq!(
            run(&tool, "EMPTY").await,
            json!("No program details found in the program folder: EMPTY")
        );
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = programs_dir();
        let tool = ProgramDetailsTool::new(dir.path().join("MSCS"));
        for name in ["..", "../MSCS", "a/b", "a\\b", ""] {
            let out = run(&tool, name).await;
            assert!(out.as_str().unwrap().starts_with("Invalid program name"), "{name}");
        }
    }

    #[tokio::test]
    async fn missing_argument_is_a_tool_error() {
        let tool = ProgramDetailsTool::new("programs");
        assert!(matches!(
            tool.execute(json!({})).await,
            Err(ToolError::InvalidArguments(_))
        ));
    }
}
