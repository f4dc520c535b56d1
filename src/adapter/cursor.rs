//! Cursor rules adapter
//!
//! Renders prompt files into `.cursor/rules/_active`, flattening by
//! basename. Rendering is a byte pass-through: any YAML front-matter
//! block (including an empty `---`/`---` header) reaches the output
//! verbatim because no byte is touched.

use super::{Adapter, AdapterConfig, basename};
use crate::error::Result;

const BASE_OUTPUT_DIR: &str = ".cursor/rules/_active";
const SEARCH_DIRS: [&str; 2] = ["prompts", "rules"];

pub struct CursorAdapter;

impl Adapter for CursorAdapter {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn search_dirs(&self) -> &'static [&'static str] {
        &SEARCH_DIRS
    }

    fn render_file(
        &self,
        _relative_path: &str,
        content: &[u8],
        _config: &AdapterConfig,
    ) -> Result<Vec<u8>> {
        Ok(content.to_vec())
    }

    fn output_path(&self, relative_path: &str, _config: &AdapterConfig) -> String {
        format!("{BASE_OUTPUT_DIR}/{}", basename(relative_path))
    }

    fn ignore_patterns(&self, _config: &AdapterConfig) -> Vec<String> {
        vec![format!("{BASE_OUTPUT_DIR}/")]
    }

    fn base_output_dir(&self, _config: &AdapterConfig) -> &'static str {
        BASE_OUTPUT_DIR
    }
}
